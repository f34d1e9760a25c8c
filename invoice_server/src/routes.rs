//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (journal writes, render, sink
//! calls) is therefore expressed as a future and awaited, so worker threads keep serving other requests in the
//! meantime.

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use ifg_common::Paise;
use invoice_engine::{
    journal_types::{Customer, OrderRecord},
    traits::{ArchivalSink, InvoiceRenderer, NotificationSink, OrderJournal, PaymentGateway},
    FulfillmentApi,
    PaymentClaim,
};
use log::*;
use serde_json::Value;

use crate::{
    data_objects::{CreateOrderRequest, VerifyRequest, VerifyResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Invoice fulfillment gateway is running.\n")
}

//----------------------------------------------   Order creation  ---------------------------------------------
route!(create_order => Post "/create-order" impl OrderJournal, InvoiceRenderer, ArchivalSink, NotificationSink, PaymentGateway);
/// Create a gateway order for the given amount and journal its billing facts.
///
/// The gateway is the source of truth for the order; the journal write is best-effort, so a journal
/// failure is logged but never fails the response.
pub async fn create_order<J, R, A, N, G>(
    body: web::Json<CreateOrderRequest>,
    api: web::Data<FulfillmentApi<J, R, A, N>>,
    gateway: web::Data<G>,
) -> Result<HttpResponse, ServerError>
where
    J: OrderJournal,
    R: InvoiceRenderer,
    A: ArchivalSink,
    N: NotificationSink,
    G: PaymentGateway,
{
    let request = body.into_inner();
    if request.amount <= 0 {
        debug!("📦️ Rejecting order creation with non-positive amount {}.", request.amount);
        return Err(ServerError::InvalidRequestBody("amount must be a positive integer in paise".to_string()));
    }
    let amount = Paise::from(request.amount);
    let receipt = request.receipt.unwrap_or_else(|| format!("rcpt_{}", Utc::now().timestamp_millis()));
    let order = gateway.create_order(amount, &receipt).await?;
    info!("📦️ Gateway order {} created for {amount}.", order.id);
    let record = OrderRecord::new(
        order.id.clone(),
        order.amount,
        request.customer.unwrap_or_default(),
        request.cart.unwrap_or_default(),
    );
    api.register_order(record).await;
    Ok(HttpResponse::Ok().json(order))
}

//----------------------------------------------   Verification  -----------------------------------------------
route!(verify => Post "/verify" impl OrderJournal, InvoiceRenderer, ArchivalSink, NotificationSink);
/// Verify a client-submitted payment claim and drive invoice fulfillment.
///
/// Responds 200 `ok: true` whenever the signature checks out and the invoice renders, regardless of
/// how the archival/notification fan-out went; 400 for missing fields or a bad signature; 500 only
/// when rendering itself fails.
pub async fn verify<J, R, A, N>(
    body: web::Json<VerifyRequest>,
    api: web::Data<FulfillmentApi<J, R, A, N>>,
) -> Result<HttpResponse, ServerError>
where
    J: OrderJournal,
    R: InvoiceRenderer,
    A: ArchivalSink,
    N: NotificationSink,
{
    let claim = body.into_inner().into_claim();
    trace!("🧾️ Received verification claim for order {} / payment {}.", claim.order_id, claim.payment_id);
    let receipt = api.fulfill(claim).await?;
    Ok(HttpResponse::Ok().json(VerifyResponse::from(receipt)))
}

//----------------------------------------------   Webhook  ----------------------------------------------------
route!(webhook => Post "" impl OrderJournal, InvoiceRenderer, ArchivalSink, NotificationSink);
/// Gateway webhook deliveries. The raw body's HMAC has already been checked by the middleware
/// wrapping this scope, so the event is treated as verified.
///
/// Webhook responses must be in the 200 range once the signature passes, otherwise the gateway will
/// retry the delivery; fulfillment errors are logged and folded into the acknowledgement.
pub async fn webhook<J, R, A, N>(
    body: web::Bytes,
    api: web::Data<FulfillmentApi<J, R, A, N>>,
) -> Result<HttpResponse, ServerError>
where
    J: OrderJournal,
    R: InvoiceRenderer,
    A: ArchivalSink,
    N: NotificationSink,
{
    let event: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("🪝️ Could not parse webhook body as JSON. {e}");
        ServerError::InvalidRequestBody(format!("Invalid webhook JSON: {e}"))
    })?;
    let event_type = event.get("event").and_then(Value::as_str).unwrap_or_default();
    if event_type != "payment.captured" {
        debug!("🪝️ Ignoring webhook event of type '{event_type}'.");
        return Ok(HttpResponse::Ok().body("OK"));
    }
    let entity = event.pointer("/payload/payment/entity").cloned().unwrap_or(Value::Null);
    let order_id = entity.get("order_id").and_then(Value::as_str).unwrap_or_default().to_string();
    let payment_id = entity.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
    if order_id.is_empty() || payment_id.is_empty() {
        warn!("🪝️ payment.captured event carries no order/payment id. Ignoring.");
        return Err(ServerError::InvalidRequestBody("payment.captured event has no order or payment id".to_string()));
    }
    let claim = PaymentClaim {
        order_id,
        payment_id,
        signature: String::new(),
        amount: entity.get("amount").and_then(Value::as_i64).map(Paise::from),
        customer: entity
            .get("email")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|email| Customer { email: Some(email.to_string()), ..Customer::default() }),
        cart: None,
    };
    match api.fulfill_verified(claim).await {
        Ok(receipt) => {
            info!("🪝️ Webhook fulfillment complete for order {} / payment {}.", receipt.order_id, receipt.payment_id);
        },
        Err(e) => {
            warn!("🪝️ Webhook fulfillment failed. The event stays acknowledged. {e}");
        },
    }
    Ok(HttpResponse::Ok().body("OK"))
}
