use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crossborder::client::*;
use crossborder::core::*;
use crossborder::soap::Operation;
use rust_decimal_macros::dec;
use tokio::sync::oneshot;

/// In-memory transport: records every request and answers with a canned
/// body per operation.
#[derive(Default)]
struct MockTransport {
    sent: Mutex<Vec<(String, String, Vec<(&'static str, String)>)>>,
    fail: bool,
}

impl MockTransport {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<(String, String, Vec<(&'static str, String)>)> {
        self.sent.lock().unwrap().clone()
    }
}

fn soap_response(op: &str, inner: &str) -> String {
    format!(
        r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="urn:fecb"><SOAP-ENV:Body><ns1:{op}Response><return>{inner}</return></ns1:{op}Response></SOAP-ENV:Body></SOAP-ENV:Envelope>"#
    )
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(
        &self,
        url: &str,
        body: String,
        headers: Vec<(&'static str, String)>,
    ) -> Result<TransportResponse, CrossBorderError> {
        if self.fail {
            return Err(CrossBorderError::Transport("connection refused".into()));
        }
        let action = headers
            .iter()
            .find(|(k, _)| *k == "SOAPAction")
            .map(|(_, v)| v.rsplit('#').next().unwrap_or_default().to_string())
            .unwrap_or_default();
        self.sent
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone(), headers));

        // Echo the first product id back so callers can tell responses apart.
        let echoed = body
            .split("<productID>")
            .nth(1)
            .and_then(|rest| rest.split("</productID>").next())
            .unwrap_or_default()
            .to_string();
        let inner = match action.as_str() {
            "ConnectLandedCost" => "<error>0</error><dutyCost>4.5</dutyCost><landedCostTransactionId>LCT-1</landedCostTransactionId>".to_string(),
            "ConnectOrder" => "<error>0</error><orderNumber>ORD-1</orderNumber>".to_string(),
            "ConnectSkuStatus" => format!(
                "<error>0</error><items><item><productID>{echoed}</productID><productStatus>OK</productStatus></item></items>"
            ),
            "ConnectOrderRemove" => "<error>1000</error><errorMessage>Invalid Partner Key</errorMessage>".to_string(),
            _ => format!("<error>0</error><errorMessage>{echoed}</errorMessage>"),
        };
        Ok(TransportResponse {
            status_code: 200,
            headers: vec![("content-type".into(), "text/xml".into())],
            body: soap_response(&action, &inner),
        })
    }
}

fn product(id: &str) -> ProductInfoEntry {
    ProductInfoEntry::new(
        id,
        "Test product",
        dec!(9.99),
        "USD",
        "TPA",
        "US",
        CartonDimensions::weight(dec!(1)).unwrap(),
        &Fields::new(),
    )
    .unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("crossborder=debug")
        .with_test_writer()
        .try_init();
}

fn mock_client(config: ClientConfig) -> (Client<Arc<MockTransport>>, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::default());
    let client = Client::with_transport(&config, Arc::clone(&transport)).unwrap();
    (client, transport)
}

// --- Output shaping ---

#[tokio::test]
async fn strip_wrapper_returns_flat_body() {
    let (client, _) = mock_client(ClientConfig::new("pk"));
    let outcome = client.product_info(&[product("SKU-1")]).await.unwrap();
    assert!(matches!(outcome, Outcome::Flat(_)));
    assert_eq!(outcome.body().error_message, "SKU-1");

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["errorCode"], 0);
    assert!(json.get("statusCode").is_none());
}

#[tokio::test]
async fn wrapper_without_attachments() {
    let (client, _) = mock_client(ClientConfig::new("pk").strip_wrapper(false));
    let outcome = client.product_info(&[product("SKU-1")]).await.unwrap();
    let wrapped = outcome.wrapped().unwrap();
    assert_eq!(wrapped.status_code, 200);
    assert_eq!(wrapped.request.text("partnerKey"), Some("pk"));
    assert!(wrapped.raw.is_none());
    assert!(wrapped.soap_header.is_none());
    assert!(wrapped.response.is_none());

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["body"]["errorCode"], 0);
    assert!(json.get("raw").is_none());
}

#[tokio::test]
async fn wrapper_attachments_follow_flags() {
    let config = ClientConfig::new("pk")
        .strip_wrapper(false)
        .return_raw(true)
        .return_soap_header(true)
        .return_full_response(true);
    let (client, _) = mock_client(config);
    let outcome = client.product_info(&[product("SKU-1")]).await.unwrap();
    let wrapped = outcome.wrapped().unwrap();
    assert!(wrapped.raw.as_deref().unwrap().contains("ConnectProductInfoResponse"));
    assert!(wrapped.soap_header.is_some());
    assert_eq!(wrapped.response.as_ref().unwrap().status_code, 200);

    let config = ClientConfig::new("pk").strip_wrapper(false).return_raw(true);
    let (client, _) = mock_client(config);
    let outcome = client.product_info(&[product("SKU-1")]).await.unwrap();
    let wrapped = outcome.wrapped().unwrap();
    assert!(wrapped.raw.is_some());
    assert!(wrapped.soap_header.is_none());
    assert!(wrapped.response.is_none());
}

// --- Wire ---

#[tokio::test]
async fn posts_to_endpoint_with_soap_headers() {
    init_tracing();
    let (client, transport) = mock_client(ClientConfig::new("  pk  ").language("es"));
    client.sku_status(&[ProductIdEntry::new("A")]).await.unwrap();
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let (url, body, headers) = &sent[0];
    assert_eq!(url, "https://api.crossborder.fedex.com/services/v4.4");
    assert!(body.contains(r#"<partnerKey xsi:type="xsd:string">pk</partnerKey><language xsi:type="xsd:string">es</language>"#));
    assert!(headers.contains(&(
        "SOAPAction",
        "https://api.crossborder.fedex.com/services/v4.4#ConnectSkuStatus".to_string()
    )));
    assert!(headers.contains(&("Content-Length", body.len().to_string())));
}

#[tokio::test]
async fn landed_cost_round_trip() {
    let (client, _) = mock_client(ClientConfig::new("pk"));
    let line = ShipmentLineItem::new("A", 1, dec!(10), "BRU").unwrap();
    let request = LandedCostRequest::new("DE", vec![line])
        .optional("service", 0);
    let outcome = client.landed_cost(&request).await.unwrap();
    let body = outcome.into_body();
    assert_eq!(body.get("dutyCost").unwrap().to_string(), "4.5000");
    assert_eq!(body.get("landedCostTransactionId"), Some(&FieldValue::from("LCT-1")));
}

#[tokio::test]
async fn order_round_trip() {
    let (client, transport) = mock_client(ClientConfig::new("pk"));
    let request = OrderRequest::new(
        "ORD-1",
        "LCT-1",
        Recipient::new("Ada", "Lovelace", "1 Main St", "London", "GB"),
        vec![OrderLineItem::new("A", 1, dec!(10), "GBP", &Fields::new()).unwrap()],
    )
    .optional("insurance", 1);
    let outcome = client.order(&request).await.unwrap();
    assert_eq!(outcome.body().get("orderNumber"), Some(&FieldValue::from("ORD-1")));
    let (_, body, _) = &transport.sent()[0];
    assert!(body.contains(r#"<insurance xsi:type="xsd:int">1</insurance>"#));
}

#[tokio::test]
async fn tracking_update_round_trip() {
    let (client, transport) = mock_client(ClientConfig::new("pk"));
    let request = TrackingUpdateRequest::new("ORD-1", vec![TrackingEntry::new("A", 1, "1Z", "DHL")]);
    client.order_tracking_update(&request).await.unwrap();
    let (_, body, _) = &transport.sent()[0];
    assert!(body.contains("<carrier>3</carrier>"));
}

// --- Errors ---

#[tokio::test]
async fn service_error_is_surfaced() {
    init_tracing();
    let (client, _) = mock_client(ClientConfig::new("pk"));
    let err = client.order_remove("ORD-1").await.unwrap_err();
    assert_eq!(err.to_string(), "Code 1000 — Invalid Partner Key");
}

#[tokio::test]
async fn transport_error_is_surfaced() {
    let config = ClientConfig::new("pk");
    let client = Client::with_transport(&config, MockTransport::failing()).unwrap();
    let err = client.sku_status(&[ProductIdEntry::new("A")]).await.unwrap_err();
    assert!(matches!(err, CrossBorderError::Transport(_)));
}

#[tokio::test]
async fn contract_errors_send_nothing() {
    let (client, transport) = mock_client(ClientConfig::new("pk"));
    let err = client.product_info(&[]).await.unwrap_err();
    assert!(matches!(err, CrossBorderError::InvalidArgument(_)));
    assert!(transport.sent().is_empty());
}

#[test]
fn invalid_config_is_rejected() {
    let transport = MockTransport::default();
    let err = Client::with_transport(&ClientConfig::new("pk").language("english"), transport);
    assert!(matches!(err, Err(CrossBorderError::InvalidArgument(_))));
}

// --- Concurrency ---

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_calls_do_not_mix() {
    let (client, transport) = mock_client(ClientConfig::new("pk").strip_wrapper(false));
    let first = [product("FIRST-1"), product("FIRST-2")];
    let second = [product("SECOND-1")];

    let (a, b) = tokio::join!(client.product_info(&first), client.product_info(&second));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.body().error_message, "FIRST-1");
    assert_eq!(b.body().error_message, "SECOND-1");

    let a_items = a.wrapped().unwrap().request.get("items").unwrap().to_string();
    assert!(a_items.contains("FIRST-2"));
    assert!(!a_items.contains("SECOND"));

    for (_, body, _) in transport.sent() {
        let has_first = body.contains("FIRST");
        let has_second = body.contains("SECOND");
        assert!(has_first != has_second, "request mixes items: {body}");
    }
}

// --- Callback convention ---

#[tokio::test]
async fn callback_receives_result() {
    let transport = Arc::new(MockTransport::default());
    let client =
        CallbackClient::with_transport(&ClientConfig::new("pk"), Arc::clone(&transport)).unwrap();
    let (tx, rx) = oneshot::channel();
    let handle = client
        .sku_status(&[ProductIdEntry::new("CB-1")], move |result: Result<Outcome, CrossBorderError>| {
            let _ = tx.send(result);
        })
        .unwrap();
    handle.await.unwrap();
    let outcome = rx.await.unwrap().unwrap();
    let rows = outcome.body().sku_statuses().unwrap();
    assert_eq!(rows[0].product_id, "CB-1");
}

#[tokio::test]
async fn callback_receives_service_error() {
    let client = CallbackClient::with_transport(&ClientConfig::new("pk"), MockTransport::default())
        .unwrap();
    let (tx, rx) = oneshot::channel();
    client
        .order_remove("ORD-1", move |result: Result<Outcome, CrossBorderError>| {
            let _ = tx.send(result);
        })
        .unwrap();
    let err = rx.await.unwrap().unwrap_err();
    assert_eq!(err.service_code(), Some(1000));
}

#[tokio::test]
async fn callback_contract_error_is_synchronous() {
    let client = CallbackClient::with_transport(&ClientConfig::new("pk"), MockTransport::default())
        .unwrap();
    let err = client
        .sku_status(&[], |_: Result<Outcome, CrossBorderError>| {
            panic!("callback must not run")
        })
        .unwrap_err();
    assert!(matches!(err, CrossBorderError::InvalidArgument(_)));
}

#[test]
fn callback_outside_runtime_is_rejected() {
    let client = CallbackClient::with_transport(&ClientConfig::new("pk"), MockTransport::default())
        .unwrap();
    let err = client
        .order_remove("ORD-1", |_: Result<Outcome, CrossBorderError>| {})
        .unwrap_err();
    assert!(matches!(err, CrossBorderError::InvalidArgument(_)));
}

#[test]
fn operations_are_named_on_the_wire() {
    assert_eq!(Operation::OrderTrackingUpdate.name(), "ConnectOrderTrackingUpdate");
}
