use ifg_common::Paise;
use invoice_engine::{
    journal_types::{ArchiveReference, BillingFacts, GatewayOrder, OrderId, OrderRecord, VerificationEvent},
    traits::{
        ArchivalSink,
        GatewayError,
        InvoiceRenderer,
        JournalError,
        NotificationSink,
        OrderJournal,
        PaymentGateway,
        RenderError,
        SinkError,
    },
};
use mockall::mock;

mock! {
    pub Journal {}
    impl OrderJournal for Journal {
        async fn append(&self, record: OrderRecord) -> Result<(), JournalError>;
        async fn lookup(&self, order_id: &OrderId) -> Option<OrderRecord>;
        async fn record_verification(&self, event: VerificationEvent) -> Result<(), JournalError>;
    }
}

mock! {
    pub Renderer {}
    impl InvoiceRenderer for Renderer {
        async fn render(&self, facts: &BillingFacts) -> Result<Vec<u8>, RenderError>;
    }
}

mock! {
    pub Archive {}
    impl ArchivalSink for Archive {
        async fn store_invoice(&self, facts: &BillingFacts, payment_id: &str, pdf: &[u8]) -> Result<ArchiveReference, SinkError>;
    }
}

mock! {
    pub Notifier {}
    impl NotificationSink for Notifier {
        async fn send_invoice(&self, facts: &BillingFacts, recipient: &str, pdf: &[u8]) -> Result<(), SinkError>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        async fn create_order(&self, amount: Paise, receipt: &str) -> Result<GatewayOrder, GatewayError>;
    }
}
