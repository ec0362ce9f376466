//! # ERC-1538 Routing Flows
//!
//! A fully linked router exercised from outside: query views against the
//! deployment table, update events, receive/fallback routing, ownership and
//! all-or-nothing updates.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use fr_01_execution_host::prelude::*;
    use fr_02_selector_registry::prelude::*;

    fn no_value() -> U256 {
        U256::zero()
    }

    // =============================================================================
    // DEPLOYMENT
    // =============================================================================

    #[test]
    fn test_delegate_construction_emits_ownership_events() {
        let mut host = Host::new(VmConfig::default(), test_catalog());
        let receipt = host.deploy(OWNER, UpdateDelegate.init_code(Bytes::new()), no_value());
        let delegate = receipt.contract_address.unwrap();

        assert_eq!(
            receipt.events::<OwnershipTransferred>(delegate),
            vec![
                OwnershipTransferred {
                    previous_owner: Address::ZERO,
                    new_owner: OWNER
                },
                OwnershipTransferred {
                    previous_owner: OWNER,
                    new_owner: Address::ZERO
                },
            ]
        );
    }

    #[test]
    fn test_proxy_construction_routes_update_only() {
        let mut host = Host::new(VmConfig::default(), test_catalog());
        let update = host
            .deploy(OWNER, UpdateDelegate.init_code(Bytes::new()), no_value())
            .contract_address
            .unwrap();
        let receipt = host.deploy(OWNER, DispatchProxy::deployment(update).unwrap(), no_value());
        let proxy = receipt.contract_address.unwrap();

        let updates = receipt.events::<FunctionUpdate>(proxy);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].function_id, selector_of(UPDATE_SIGNATURE));
        assert_eq!(updates[0].new_delegate, update);
        assert!(receipt.events::<CommitMessage>(proxy).is_empty());
    }

    #[test]
    fn test_ownership_after_deployment() {
        let mut fixture = RouterFixture::new();
        let RouterDeployment {
            proxy,
            update_delegate,
            query_delegate,
        } = fixture.router;

        for delegate in [update_delegate, query_delegate] {
            let owner: Address = fixture
                .host
                .call_function(OTHER, delegate, "owner()", &())
                .unwrap();
            assert_eq!(owner, Address::ZERO);
        }
        assert_eq!(fixture.client(OTHER).owner().unwrap(), OWNER);
        assert_eq!(fixture.client(OTHER).proxy(), proxy);
    }

    // =============================================================================
    // QUERIES
    // =============================================================================

    #[test]
    fn test_total_functions() {
        let mut fixture = RouterFixture::new();
        let expected = fixture.expected_routes().len();
        assert_eq!(expected, 12);
        assert_eq!(
            fixture.client(OTHER).total_functions().unwrap(),
            U256::from(expected)
        );
    }

    #[test]
    fn test_function_by_index_and_by_id() {
        let mut fixture = RouterFixture::new();
        let routes = fixture.expected_routes();
        let mut client = fixture.client(OTHER);

        for (index, (signature, delegate)) in routes.iter().enumerate() {
            let expected = FunctionEntry {
                id: selector_of(signature),
                signature: signature.clone(),
                delegate: *delegate,
            };
            assert_eq!(client.function_by_index(U256::from(index)).unwrap(), expected);
            assert_eq!(client.function_by_id(selector_of(signature)).unwrap(), expected);
        }
    }

    #[test]
    fn test_function_exists_and_delegate_address() {
        let mut fixture = RouterFixture::new();
        let routes = fixture.expected_routes();
        let mut client = fixture.client(OTHER);

        for (signature, delegate) in &routes {
            assert!(client.function_exists(signature).unwrap());
            assert_eq!(client.delegate_address(signature).unwrap(), *delegate);
        }
        assert!(!client.function_exists("set(bytes)").unwrap());
        assert_eq!(client.delegate_address("set(bytes)").unwrap(), Address::ZERO);
    }

    #[test]
    fn test_function_signatures() {
        let mut fixture = RouterFixture::new();
        let expected: String = fixture
            .expected_routes()
            .iter()
            .map(|(signature, _)| format!("{signature};"))
            .collect();
        assert_eq!(fixture.client(OTHER).function_signatures().unwrap(), expected);
    }

    #[test]
    fn test_delegate_addresses_and_their_signatures() {
        let mut fixture = RouterFixture::new();
        let routes = fixture.expected_routes();
        let router = fixture.router;
        let mut client = fixture.client(OTHER);

        let delegates = client.delegate_addresses().unwrap();
        assert_eq!(delegates, vec![router.update_delegate, router.query_delegate]);
        for delegate in delegates {
            let expected: String = routes
                .iter()
                .filter(|(_, d)| *d == delegate)
                .map(|(signature, _)| format!("{signature};"))
                .collect();
            assert_eq!(client.delegate_function_signatures(delegate).unwrap(), expected);
        }
    }

    #[test]
    fn test_query_blob_from_build_artifact() {
        let blob = signatures_from_abi_json(&query_delegate_artifact()).unwrap();
        assert_eq!(blob, signature_list(&QueryDelegate.functions()));
    }

    // =============================================================================
    // RECEIVE / FALLBACK
    // =============================================================================

    #[test]
    fn test_receive() {
        let mut fixture = RouterFixture::new();
        let (proxy, test_contract) = (fixture.router.proxy, fixture.test_contract);

        let receipt = fixture
            .client(OWNER)
            .update_contract(test_contract, "receive;", "adding receive delegate")
            .unwrap();
        assert_eq!(
            receipt.events::<FunctionUpdate>(proxy),
            vec![FunctionUpdate {
                function_id: Selector::new([0x00; 4]),
                old_delegate: Address::ZERO,
                new_delegate: test_contract,
                function_signature: "receive".into(),
            }]
        );
        assert_eq!(
            receipt.events::<CommitMessage>(proxy),
            vec![CommitMessage {
                message: "adding receive delegate".into()
            }]
        );

        let receipt = fixture.host.transact(OWNER, proxy, U256::one(), Bytes::new());
        assert!(receipt.success);
        assert_eq!(receipt.logs[0].topics[0], Receive::topic());
        assert_eq!(receipt.logs[0].address, proxy);
        assert_eq!(fixture.host.balance(&proxy), U256::one());
    }

    #[test]
    fn test_fallback() {
        let mut fixture = RouterFixture::new();
        let (proxy, test_contract) = (fixture.router.proxy, fixture.test_contract);

        let receipt = fixture
            .client(OWNER)
            .update_contract(test_contract, "fallback;", "adding fallback delegate")
            .unwrap();
        let updates = receipt.events::<FunctionUpdate>(proxy);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].function_id, Selector::new([0xff; 4]));
        assert_eq!(updates[0].old_delegate, Address::ZERO);
        assert_eq!(updates[0].new_delegate, test_contract);
        assert_eq!(updates[0].function_signature, "fallback");

        let payload = Bytes::from_slice(&[0xc0, 0xff, 0xee]);
        let receipt = fixture
            .host
            .transact(OWNER, proxy, U256::one(), payload.clone());
        assert!(receipt.success);
        assert_eq!(receipt.logs[0].topics[0], Fallback::topic());
        assert_eq!(
            receipt.events::<Fallback>(proxy),
            vec![Fallback {
                value: U256::one(),
                data: payload
            }]
        );
    }

    #[test]
    fn test_empty_call_without_receive_uses_fallback() {
        let mut fixture = RouterFixture::new();
        let (proxy, test_contract) = (fixture.router.proxy, fixture.test_contract);
        fixture
            .client(OWNER)
            .update_contract(test_contract, "fallback;", "adding fallback delegate")
            .unwrap();

        // The test contract itself tells receive from fallback by payload.
        let receipt = fixture.host.transact(OTHER, proxy, U256::one(), Bytes::new());
        assert_eq!(receipt.events::<Receive>(proxy).len(), 1);
    }

    #[test]
    fn test_no_update() {
        let mut fixture = RouterFixture::new();
        let (proxy, test_contract) = (fixture.router.proxy, fixture.test_contract);
        let mut client = fixture.client(OWNER);

        client
            .update_contract(test_contract, "fallback;", "adding fallback delegate")
            .unwrap();
        let receipt = client
            .update_contract(test_contract, "fallback;", "no changes")
            .unwrap();

        assert!(receipt.events::<FunctionUpdate>(proxy).is_empty());
        assert_eq!(
            receipt.events::<CommitMessage>(proxy),
            vec![CommitMessage {
                message: "no changes".into()
            }]
        );
    }

    #[test]
    fn test_remove_fallback() {
        let mut fixture = RouterFixture::new();
        let (proxy, test_contract) = (fixture.router.proxy, fixture.test_contract);
        let mut client = fixture.client(OWNER);

        client
            .update_contract(test_contract, "fallback;", "adding fallback delegate")
            .unwrap();
        let receipt = client
            .update_contract(Address::ZERO, "fallback;", "removing")
            .unwrap();

        let updates = receipt.events::<FunctionUpdate>(proxy);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].old_delegate, test_contract);
        assert_eq!(updates[0].new_delegate, Address::ZERO);
        assert_eq!(updates[0].function_signature, "fallback");
        assert_eq!(receipt.events::<CommitMessage>(proxy).len(), 1);

        let receipt = fixture
            .host
            .transact(OWNER, proxy, U256::zero(), Bytes::from_slice(&[0xc0, 0xff, 0xee]));
        assert!(!receipt.success);
    }

    // =============================================================================
    // DELEGATED STATE
    // =============================================================================

    #[test]
    fn test_set_and_get_through_router() {
        let mut fixture = RouterFixture::new();
        let (proxy, test_contract) = (fixture.router.proxy, fixture.test_contract);
        let blob = signature_list(&TestContract.functions());
        fixture
            .client(OWNER)
            .update_contract(test_contract, &blob, "Linking TestContract")
            .unwrap();

        let value = Bytes::from_slice(b"stored in the proxy");
        assert!(fixture.host.transact(OTHER, proxy, U256::zero(), set_call(&value)).success);

        let through_proxy: Bytes = fixture.host.call_function(OTHER, proxy, "get()", &()).unwrap();
        let direct: Bytes = fixture
            .host
            .call_function(OTHER, test_contract, "get()", &())
            .unwrap();
        assert_eq!(through_proxy, value);
        assert!(direct.is_empty());
    }

    #[test]
    fn test_replace_moves_route_between_delegates() {
        let mut fixture = RouterFixture::new();
        let (proxy, test_contract) = (fixture.router.proxy, fixture.test_contract);
        let query_delegate = fixture.router.query_delegate;
        let mut client = fixture.client(OWNER);

        let receipt = client
            .update_contract(test_contract, "totalFunctions();", "Shadow totalFunctions")
            .unwrap();
        let updates = receipt.events::<FunctionUpdate>(proxy);
        assert_eq!(updates[0].old_delegate, query_delegate);
        assert_eq!(updates[0].new_delegate, test_contract);

        assert_eq!(client.delegate_address("totalFunctions()").unwrap(), test_contract);
        assert_eq!(
            client.delegate_addresses().unwrap().last().copied(),
            Some(test_contract)
        );
    }

    #[test]
    fn test_removal_compacts_by_swapping_last() {
        let mut fixture = RouterFixture::new();
        let test_contract = fixture.test_contract;
        let mut client = fixture.client(OWNER);

        client
            .update_contract(test_contract, "a();b();c();", "Add a, b, c")
            .unwrap();
        // Ordinals: 12 = a(), 13 = b(), 14 = c()
        client
            .update_contract(Address::ZERO, "a();", "Remove a")
            .unwrap();

        assert_eq!(client.total_functions().unwrap(), U256::from(14));
        assert_eq!(
            client.function_by_index(U256::from(12)).unwrap().signature,
            "c()"
        );
        assert_eq!(
            client.function_by_index(U256::from(13)).unwrap().signature,
            "b()"
        );
        assert!(client.function_by_index(U256::from(14)).is_err());
    }

    // =============================================================================
    // ACCESS CONTROL AND ATOMICITY
    // =============================================================================

    #[test]
    fn test_non_owner_cannot_update() {
        let mut fixture = RouterFixture::new();
        let test_contract = fixture.test_contract;
        let mut client = fixture.client(OTHER);
        let before = client.function_signatures().unwrap();

        let err = client
            .update_contract(test_contract, "fallback;", "hostile")
            .unwrap_err();
        assert!(err.reason().unwrap().contains("not the owner"));
        assert_eq!(client.function_signatures().unwrap(), before);
    }

    #[test]
    fn test_malformed_blob_changes_nothing() {
        let mut fixture = RouterFixture::new();
        let (proxy, test_contract) = (fixture.router.proxy, fixture.test_contract);
        let before = fixture.client(OTHER).function_signatures().unwrap();

        let data = encode_call(
            UPDATE_SIGNATURE,
            &(test_contract, "get();;set(bytes);", "interior empty token"),
        )
        .unwrap();
        let receipt = fixture.host.transact(OWNER, proxy, U256::zero(), data);
        assert!(!receipt.success);
        assert!(receipt.logs.is_empty());
        assert_eq!(fixture.client(OTHER).function_signatures().unwrap(), before);
    }

    #[test]
    fn test_ownership_handover_through_router() {
        let mut fixture = RouterFixture::new();
        let (proxy, test_contract) = (fixture.router.proxy, fixture.test_contract);
        let mut client = fixture.client(OWNER);

        let receipt = client.transfer_ownership(OTHER).unwrap();
        assert_eq!(
            receipt.events::<OwnershipTransferred>(proxy),
            vec![OwnershipTransferred {
                previous_owner: OWNER,
                new_owner: OTHER
            }]
        );

        assert!(client.update_contract(test_contract, "get();", "old owner").is_err());
        client.set_sender(OTHER);
        client.update_contract(test_contract, "get();", "new owner").unwrap();

        client.renounce_ownership().unwrap();
        assert_eq!(client.owner().unwrap(), Address::ZERO);
        assert!(client.update_contract(test_contract, "set(bytes);", "nobody").is_err());
        assert!(client.transfer_ownership(OWNER).is_err());

        client.set_sender(Address::ZERO);
        assert!(client.update_contract(test_contract, "set(bytes);", "zero").is_err());
        assert!(client.transfer_ownership(OTHER).is_err());
        assert_eq!(client.owner().unwrap(), Address::ZERO);
        assert!(!client.function_exists("set(bytes)").unwrap());
    }

    #[test]
    fn test_update_delegate_rejects_direct_updates() {
        let mut fixture = RouterFixture::new();
        let (update_delegate, test_contract) =
            (fixture.router.update_delegate, fixture.test_contract);

        for sender in [OWNER, OTHER, Address::ZERO] {
            let data = encode_call(UPDATE_SIGNATURE, &(test_contract, "get();", "direct")).unwrap();
            let receipt = fixture.host.transact(sender, update_delegate, no_value(), data);
            assert!(!receipt.success);
            assert!(receipt.logs.is_empty());

            let mut direct = RouterClient::new(&mut fixture.host, update_delegate, sender);
            assert!(direct.transfer_ownership(OTHER).is_err());
            assert_eq!(direct.owner().unwrap(), Address::ZERO);
        }
    }
}
