//! # Generic Factory Flows
//!
//! Prediction, deployment and duplicate rejection with a real delegate
//! module, and factory-deployed delegates linked into a router.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use fr_01_execution_host::prelude::*;
    use fr_03_deployment_factory::prelude::*;
    use rand::{Rng, RngCore};

    fn random32() -> Hash {
        let mut salt = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut salt);
        Hash::new(salt)
    }

    fn random_bytes(len: usize) -> Bytes {
        let mut bytes = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut bytes);
        Bytes::from_vec(bytes)
    }

    fn deploy_factory(host: &mut Host) -> Address {
        host.deploy(OWNER, GenericFactory.init_code(Bytes::new()), U256::zero())
            .contract_address
            .unwrap()
    }

    #[test]
    fn test_create_contract_predict_success_then_duplicate() {
        let mut host = Host::new(VmConfig::default(), test_catalog());
        let factory = deploy_factory(&mut host);
        let code = test_contract_code();
        let salt = random32();

        let predicted = AddressPredictor::predict_code(factory, code.as_slice(), salt);
        let mut client = FactoryClient::new(&mut host, factory, OWNER);
        assert_eq!(client.predict_address(&code, salt).unwrap(), predicted);

        let (address, receipt) = client.create_contract(&code, salt).unwrap();
        assert_eq!(address, predicted);
        assert_eq!(
            receipt.events::<NewContract>(factory),
            vec![NewContract { addr: predicted }]
        );

        let err = client.create_contract(&code, salt).unwrap_err();
        assert!(err.reason().unwrap().contains("already occupied"));
    }

    #[test]
    fn test_create_contract_and_call_predict_success_then_duplicate() {
        let mut host = Host::new(VmConfig::default(), test_catalog());
        let factory = deploy_factory(&mut host);
        let code = test_contract_code();
        let salt = random32();
        let value = random_bytes(64);
        let call = set_call(&value);

        let predicted =
            AddressPredictor::predict_code_with_call(factory, code.as_slice(), salt, call.as_slice());
        let mut client = FactoryClient::new(&mut host, factory, OWNER);
        assert_eq!(
            client.predict_address_with_call(&code, salt, &call).unwrap(),
            predicted
        );

        let (address, receipt) = client.create_contract_and_call(&code, salt, &call).unwrap();
        assert_eq!(address, predicted);
        assert_eq!(receipt.events::<NewContract>(factory)[0].addr, predicted);

        let err = client
            .create_contract_and_call(&code, salt, &call)
            .unwrap_err();
        assert!(err.reason().is_some());

        let stored: Bytes = host.call_function(OTHER, address, "get()", &()).unwrap();
        assert_eq!(stored, value);
    }

    #[test]
    fn test_same_code_and_salt_different_calls_land_apart() {
        let mut host = Host::new(VmConfig::default(), test_catalog());
        let factory = deploy_factory(&mut host);
        let code = test_contract_code();
        let salt = random32();
        let mut client = FactoryClient::new(&mut host, factory, OWNER);

        let (first, _) = client
            .create_contract_and_call(&code, salt, &set_call(&Bytes::from_slice(b"one")))
            .unwrap();
        let (second, _) = client
            .create_contract_and_call(&code, salt, &set_call(&Bytes::from_slice(b"two")))
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_failed_call_leaves_no_instance() {
        let mut host = Host::new(VmConfig::default(), test_catalog());
        let factory = deploy_factory(&mut host);
        let code = test_contract_code();
        let salt = random32();
        // `set(bytes)` with a payload that does not decode as bytes
        let call = Bytes::from_slice(&selector_of("set(bytes)").0);

        let predicted =
            AddressPredictor::predict_code_with_call(factory, code.as_slice(), salt, call.as_slice());
        let receipt_err = FactoryClient::new(&mut host, factory, OWNER)
            .create_contract_and_call(&code, salt, &call)
            .unwrap_err();
        assert!(receipt_err.reason().is_some());
        assert!(host.account(&predicted).is_none());
        assert!(host.code(&predicted).is_empty());
    }

    #[test]
    fn test_prediction_agrees_for_random_factories() {
        let mut rng = rand::thread_rng();
        for _ in 0..8 {
            let mut host = Host::new(VmConfig::default(), test_catalog());
            let deployer = Address::new(rng.gen());
            let factory = host
                .deploy(deployer, GenericFactory.init_code(Bytes::new()), U256::zero())
                .contract_address
                .unwrap();
            let salt = random32();
            let call = set_call(&random_bytes(rng.gen_range(1..96)));
            let code = test_contract_code();

            let predicted =
                AddressPredictor::predict_code_with_call(factory, code.as_slice(), salt, call.as_slice());
            let (address, _) = FactoryClient::new(&mut host, factory, deployer)
                .create_contract_and_call(&code, salt, &call)
                .unwrap();
            assert_eq!(address, predicted);
        }
    }

    #[test]
    fn test_factory_deployed_delegate_linked_into_router() {
        let mut fixture = RouterFixture::new();
        let proxy = fixture.router.proxy;
        let factory = deploy_factory(&mut fixture.host);
        let salt = random32();

        let predicted = AddressPredictor::predict_code(factory, test_contract_code().as_slice(), salt);
        let blob = signature_list(&TestContract.functions());

        // The route can be registered before the delegate exists.
        fixture
            .client(OWNER)
            .update_contract(predicted, &blob, "Link predicted TestContract")
            .unwrap();
        let (address, _) = FactoryClient::new(&mut fixture.host, factory, OTHER)
            .create_contract(&test_contract_code(), salt)
            .unwrap();
        assert_eq!(address, predicted);

        let value = Bytes::from_slice(b"routed");
        assert!(fixture
            .host
            .transact(OTHER, proxy, U256::zero(), set_call(&value))
            .success);
        let stored: Bytes = fixture.host.call_function(OTHER, proxy, "get()", &()).unwrap();
        assert_eq!(stored, value);
    }
}
