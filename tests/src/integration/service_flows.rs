//! # Service Flows
//!
//! Concurrent submitters driving a router through the async execution
//! service, and the service used behind the `ExecutionApi` port.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use async_trait::async_trait;
    use fr_01_execution_host::prelude::*;
    use fr_02_selector_registry::prelude::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    // Counts what passes through to the wrapped api.
    struct Recording<A> {
        inner: A,
        executed: AtomicU64,
        calls: AtomicU64,
    }

    impl<A> Recording<A> {
        fn new(inner: A) -> Self {
            Self {
                inner,
                executed: AtomicU64::new(0),
                calls: AtomicU64::new(0),
            }
        }
    }

    #[async_trait]
    impl<A: ExecutionApi> ExecutionApi for Recording<A> {
        async fn execute(&self, tx: Transaction) -> Receipt {
            self.executed.fetch_add(1, Ordering::SeqCst);
            self.inner.execute(tx).await
        }

        async fn call(&self, from: Address, to: Address, data: Bytes) -> Result<Bytes, Revert> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.call(from, to, data).await
        }
    }

    fn linked_service() -> (ExecutionService, RouterDeployment, Address) {
        let mut fixture = RouterFixture::new();
        let test_contract = fixture.test_contract;
        fixture
            .client(OWNER)
            .update_contract(
                test_contract,
                &signature_list(&TestContract.functions()),
                "Add TestContract",
            )
            .unwrap();
        (
            ExecutionService::new(fixture.host),
            fixture.router,
            test_contract,
        )
    }

    #[tokio::test]
    async fn test_concurrent_updates_through_service() {
        let (service, router, test_contract) = linked_service();

        let mut handles = Vec::new();
        for i in 0..8u8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let blob = format!("extra{i}();");
                let data = encode_call(UPDATE_SIGNATURE, &(test_contract, blob, "extra")).unwrap();
                service
                    .submit(
                        Uuid::new_v4(),
                        Transaction::call(OWNER, router.proxy, U256::zero(), data),
                    )
                    .await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().success);
        }

        let total = service
            .query(
                Uuid::new_v4(),
                OTHER,
                router.proxy,
                encode_call("totalFunctions()", &()).unwrap(),
            )
            .await
            .unwrap();
        // 12 after deployment, 2 from TestContract, 8 extras
        assert_eq!(decode_return::<U256>(total.as_slice()).unwrap(), U256::from(22));

        let stats = service.stats().await;
        assert_eq!(stats.transactions_executed, 8);
        assert_eq!(stats.successful_executions, 8);
        assert_eq!(stats.read_only_calls, 1);
    }

    #[tokio::test]
    async fn test_concurrent_writers_serialize_to_one_value() {
        let (service, router, _) = linked_service();

        let mut handles = Vec::new();
        for i in 0..16u8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .submit(
                        Uuid::new_v4(),
                        Transaction::call(
                            OTHER,
                            router.proxy,
                            U256::zero(),
                            set_call(&Bytes::from_vec(vec![i])),
                        ),
                    )
                    .await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().success);
        }

        let stored = service
            .query(
                Uuid::new_v4(),
                OTHER,
                router.proxy,
                encode_call("get()", &()).unwrap(),
            )
            .await
            .unwrap();
        let stored: Bytes = decode_return(stored.as_slice()).unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored.as_slice()[0] < 16);

        let stats = service.stats().await;
        assert_eq!(stats.transactions_executed, 16);
        assert_eq!(stats.successful_executions, 16);
        let nonce = service.inspect(|host| host.nonce(&OTHER)).await;
        assert_eq!(nonce, 16);
    }

    #[tokio::test]
    async fn test_rejected_update_counts_as_failure() {
        let (service, router, test_contract) = linked_service();
        let data = encode_call(UPDATE_SIGNATURE, &(test_contract, "get();", "")).unwrap();

        let receipt = service
            .submit(
                Uuid::new_v4(),
                Transaction::call(OTHER, router.proxy, U256::zero(), data),
            )
            .await;
        assert!(!receipt.success);
        assert!(receipt.logs.is_empty());

        let stats = service.stats().await;
        assert_eq!(stats.failed_executions, 1);
        assert_eq!(stats.successful_executions, 0);
    }

    #[tokio::test]
    async fn test_router_behind_execution_api_port() {
        let (service, router, _) = linked_service();
        let api: Arc<dyn ExecutionApi> = Arc::new(Recording::new(service.clone()));

        let value = Bytes::from_slice(b"port");
        let receipt = api
            .transact(OTHER, router.proxy, U256::zero(), set_call(&value))
            .await;
        assert!(receipt.success);

        let output = api
            .call(OTHER, router.proxy, encode_call("get()", &()).unwrap())
            .await
            .unwrap();
        assert_eq!(decode_return::<Bytes>(output.as_slice()).unwrap(), value);

        let unrouted = api
            .call(OTHER, router.proxy, encode_call("nothing()", &()).unwrap())
            .await
            .unwrap_err();
        assert!(unrouted.reason().is_some());

        let stats = service.stats().await;
        assert_eq!(stats.transactions_executed, 1);
        assert_eq!(stats.read_only_calls, 2);
    }

    #[tokio::test]
    async fn test_recording_wrapper_counts() {
        let (service, router, _) = linked_service();
        let api = Recording::new(service);

        api.deploy(OWNER, test_contract_code(), U256::zero()).await;
        api.transact(OTHER, router.proxy, U256::zero(), Bytes::new())
            .await;
        let _ = api
            .call(OTHER, router.proxy, encode_call("owner()", &()).unwrap())
            .await;

        assert_eq!(api.executed.load(Ordering::SeqCst), 2);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }
}
