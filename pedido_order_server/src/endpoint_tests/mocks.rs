use mockall::mock;
use pedido_order_engine::{
    db_types::{NewOrder, Order, OrderStatus, PaymentEvent, UserRecord},
    traits::{
        CartStore,
        CheckoutRequest,
        CheckoutSession,
        DriverStore,
        GatewayError,
        OrderDatabase,
        OrderFlowError,
        PaymentDetails,
        PaymentGateway,
        UserStore,
    },
};

mock! {
    pub Backend {}
    impl OrderDatabase for Backend {
        async fn insert_order(&self, order: &NewOrder, phone: &str) -> Result<Order, OrderFlowError>;
        async fn fetch_order(&self, id: i64) -> Result<Option<Order>, OrderFlowError>;
        async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderFlowError>;
        async fn fetch_all_orders(&self) -> Result<Vec<Order>, OrderFlowError>;
        async fn set_payment_ref(&self, id: i64, payment_ref: &str) -> Result<Order, OrderFlowError>;
        async fn apply_payment_update(&self, id: i64, status: OrderStatus, payment: bool, payment_ref: &str, provider_status: &str) -> Result<Order, OrderFlowError>;
        async fn update_status(&self, id: i64, status: OrderStatus, payment: bool) -> Result<Order, OrderFlowError>;
        async fn delete_order(&self, id: i64) -> Result<bool, OrderFlowError>;
        async fn set_driver(&self, id: i64, driver_id: &str) -> Result<Order, OrderFlowError>;
        async fn active_orders_for_driver(&self, driver_id: &str) -> Result<i64, OrderFlowError>;
        async fn fetch_payment_events(&self, order_id: i64) -> Result<Vec<PaymentEvent>, OrderFlowError>;
    }
    impl UserStore for Backend {
        async fn fetch_user(&self, user_id: &str) -> Result<Option<UserRecord>, OrderFlowError>;
    }
    impl CartStore for Backend {
        async fn clear_cart(&self, customer_id: &str) -> Result<(), OrderFlowError>;
    }
    impl DriverStore for Backend {
        async fn driver_exists(&self, driver_id: &str) -> Result<bool, OrderFlowError>;
        async fn delete_driver(&self, driver_id: &str) -> Result<bool, OrderFlowError>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn create_preference(&self, request: &CheckoutRequest) -> Result<CheckoutSession, GatewayError>;
        async fn get_payment(&self, payment_id: &str) -> Result<PaymentDetails, GatewayError>;
    }
}
