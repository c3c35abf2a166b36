use brokerage_engine::{
    db_types::{CommissionConfig, OrderStatusType, QuantityUnit},
    helpers::parse_order_date,
    order_objects::{ModifyOrderRequest, NewOrderRequest, OrderQueryFilter},
    pricing::{compute_commission, round2, to_linear_measure},
    AccountManagement,
};
use cucumber::{gherkin::Step, then, when};
use log::*;
use rust_decimal::Decimal;

use crate::cucumber::BrokerageWorld;

fn decimal(value: &str) -> Decimal {
    value.parse::<Decimal>().unwrap_or_else(|e| panic!("{value} is not a decimal. {e}"))
}

fn docstring_json(step: &Step) -> serde_json::Value {
    let doc = step.docstring().expect("Step has no docstring");
    serde_json::from_str(doc).unwrap_or_else(|e| panic!("Docstring is not valid JSON. {e}\n{doc}"))
}

//                customer "Ravi" orders 12 TAKKA of "Rayon 60s" from "Acme" at 10
#[when(expr = "customer {string} orders {word} {word} of {string} from {string} at {word}")]
async fn place_order(
    world: &mut BrokerageWorld,
    customer: String,
    quantity: String,
    unit: String,
    quality: String,
    manufacturer: String,
    rate: String,
) {
    let order = OrderLine { customer, quantity, unit, quality, manufacturer, rate };
    submit_order_line(world, order, "2024-03-15").await;
}

//                customer "Ravi" orders 12 TAKKA of "Rayon 60s" from "Acme" at 10 on "2024-03-01"
#[when(expr = "customer {string} orders {word} {word} of {string} from {string} at {word} on {string}")]
#[allow(clippy::too_many_arguments)]
async fn place_dated_order(
    world: &mut BrokerageWorld,
    customer: String,
    quantity: String,
    unit: String,
    quality: String,
    manufacturer: String,
    rate: String,
    order_date: String,
) {
    let order = OrderLine { customer, quantity, unit, quality, manufacturer, rate };
    submit_order_line(world, order, &order_date).await;
}

struct OrderLine {
    customer: String,
    quantity: String,
    unit: String,
    quality: String,
    manufacturer: String,
    rate: String,
}

async fn submit_order_line(world: &mut BrokerageWorld, order: OrderLine, order_date: &str) {
    let request = NewOrderRequest {
        customer_id: Some(world.customer_id(&order.customer)),
        manufacturer_id: Some(world.manufacturer_id(&order.manufacturer)),
        rate: Some(decimal(&order.rate)),
        quantity: Some(decimal(&order.quantity)),
        quantity_unit: Some(order.unit),
        quality_name: Some(order.quality),
        order_date: Some(order_date.to_string()),
        ..Default::default()
    };
    let result = world.orders().create_order(world.account_id(), request).await;
    world.record(result);
}

#[when(expr = "I submit the order request:")]
async fn submit_order_request(world: &mut BrokerageWorld, step: &Step) {
    let request: NewOrderRequest = serde_json::from_value(docstring_json(step)).expect("Invalid order request");
    let result = world.orders().create_order(world.account_id(), request).await;
    world.record(result);
}

#[when(expr = "I update the order with:")]
async fn update_order(world: &mut BrokerageWorld, step: &Step) {
    let order_id = world.last_order().id;
    let request: ModifyOrderRequest = serde_json::from_value(docstring_json(step)).expect("Invalid update request");
    let result = world.orders().update_order(world.account_id(), order_id, request).await;
    world.record(result);
}

#[when(expr = "I update order {int} with:")]
async fn update_order_by_id(world: &mut BrokerageWorld, order_id: i64, step: &Step) {
    let request: ModifyOrderRequest = serde_json::from_value(docstring_json(step)).expect("Invalid update request");
    let result = world.orders().update_order(world.account_id(), order_id, request).await;
    world.record(result);
}

#[when("I fetch the order again")]
async fn fetch_order(world: &mut BrokerageWorld) {
    let order_id = world.last_order().id;
    let order = world
        .orders()
        .order_by_id(world.account_id(), order_id)
        .await
        .expect("Error fetching order")
        .expect("Order has disappeared");
    world.record(Ok(order));
}

#[then(expr = "the order succeeds with sequence number {int}")]
async fn order_succeeds(world: &mut BrokerageWorld, order_no: i64) {
    assert_eq!(world.last_order().order_no, order_no);
}

#[then(expr = "the order status is {word}")]
async fn order_status(world: &mut BrokerageWorld, status: String) {
    let status = status.parse::<OrderStatusType>().expect("Invalid status");
    assert_eq!(world.last_order().status, status);
}

#[then(expr = "the order unit is {word}")]
async fn order_unit(world: &mut BrokerageWorld, unit: String) {
    let unit = unit.parse::<QuantityUnit>().expect("Invalid unit");
    assert_eq!(world.last_order().quantity_unit, unit);
}

#[then("the lot size is between 1450 and 1550 meters")]
async fn lot_size_in_band(world: &mut BrokerageWorld) {
    let lot_meters = world.last_order().lot_meters.expect("Order has no lot size");
    assert!(lot_meters >= Decimal::from(1450) && lot_meters < Decimal::from(1550), "Lot size {lot_meters}");
    assert_eq!(round2(lot_meters), lot_meters);
}

#[then("the order has no lot size")]
async fn no_lot_size(world: &mut BrokerageWorld) {
    assert_eq!(world.last_order().lot_meters, None);
}

#[then("the lot size is unchanged")]
async fn lot_size_unchanged(world: &mut BrokerageWorld) {
    let before = world.previous_order.as_ref().expect("No earlier order state").lot_meters;
    assert!(before.is_some());
    assert_eq!(world.last_order().lot_meters, before);
}

#[then(expr = "the meters are {word}")]
async fn meters_are(world: &mut BrokerageWorld, meters: String) {
    assert_eq!(world.last_order().meter, decimal(&meters));
}

#[then("the meters match the quantity converted with the lot size")]
async fn meters_match_lot_size(world: &mut BrokerageWorld) {
    let order = world.last_order();
    let meters = to_linear_measure(order.quantity, order.quantity_unit, order.lot_meters).expect("Meters overflowed");
    let expected = round2(meters);
    assert_eq!(order.meter, expected);
}

#[then(expr = "the commission is {word}")]
async fn commission_is(world: &mut BrokerageWorld, amount: String) {
    assert_eq!(world.last_order().commission_amount, Some(decimal(&amount)));
}

//   the commission is 1 percent of the value of 12 plus GST
#[then(expr = "the commission is {word} percent of the value of {word} plus GST")]
async fn commission_matches_percent(world: &mut BrokerageWorld, percent: String, quantity: String) {
    let order = world.last_order();
    let config = CommissionConfig::Percent { percent: decimal(&percent) };
    let expected = compute_commission(decimal(&quantity), order.rate, order.quantity_unit, order.lot_meters, &config);
    assert_eq!(order.commission_amount, expected.ok());
}

#[then(expr = "the progress commission is {word}")]
async fn progress_commission_is(world: &mut BrokerageWorld, amount: String) {
    assert_eq!(world.last_order().progress_commission_amount, Some(decimal(&amount)));
}

#[then("there is no progress commission")]
async fn no_progress_commission(world: &mut BrokerageWorld) {
    let order = world.last_order();
    assert_eq!(order.progress_commission_amount, None);
    let json = serde_json::to_value(order).expect("Order view does not serialize");
    assert!(json.get("progressCommissionAmount").is_none());
}

#[then(expr = "the processed quantity is {int}")]
async fn processed_quantity_is(world: &mut BrokerageWorld, processed: i64) {
    assert_eq!(world.last_order().processed_quantity, processed);
}

#[then(expr = "the remarks are {string}")]
async fn remarks_are(world: &mut BrokerageWorld, remarks: String) {
    assert_eq!(world.last_order().remarks.as_deref(), Some(remarks.as_str()));
}

#[then("the order has no remarks")]
async fn no_remarks(world: &mut BrokerageWorld) {
    assert_eq!(world.last_order().remarks, None);
}

#[then(expr = "the payment is due in {int} days")]
async fn payment_due(world: &mut BrokerageWorld, days: i64) {
    assert_eq!(world.last_order().payment_due_days, Some(days));
}

#[then("the order has no payment terms")]
async fn no_payment_terms(world: &mut BrokerageWorld) {
    assert_eq!(world.last_order().payment_due_days, None);
}

#[then(expr = "the request fails with a {int} error containing {string}")]
async fn request_fails(world: &mut BrokerageWorld, status: u16, message: String) {
    let err = world.last_error.take().expect("The last request did not fail");
    assert_eq!(err.status_code(), status, "Unexpected error: {err}");
    let body = err.error_body();
    let text = body["message"].as_str().expect("Error body has no message");
    assert!(text.contains(&message), "Expected '{message}' in '{text}'");
}

#[then(expr = "the account has issued {int} order numbers")]
async fn account_counter(world: &mut BrokerageWorld, count: i64) {
    let account = world
        .accounts()
        .account_by_id(world.account_id())
        .await
        .expect("Error fetching account")
        .expect("Account does not exist");
    assert_eq!(account.order_counter, count);
}

#[then(expr = "there are {int} orders")]
async fn order_count(world: &mut BrokerageWorld, count: usize) {
    let orders = world.orders().search_orders(world.account_id(), OrderQueryFilter::default()).await.expect("Search failed");
    assert_eq!(orders.len(), count);
    let numbers = orders.iter().map(|o| o.order_no).collect::<Vec<_>>();
    debug!("🚀️ Order numbers: {numbers:?}");
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
}

#[then(expr = "there are {int} {word} orders for customer {string}")]
async fn order_count_for_customer(world: &mut BrokerageWorld, count: usize, status: String, customer: String) {
    let status = status.parse::<OrderStatusType>().expect("Invalid status");
    let query = OrderQueryFilter::default().with_customer_id(world.customer_id(&customer)).with_status(status);
    let orders = world.orders().search_orders(world.account_id(), query).await.expect("Search failed");
    assert_eq!(orders.len(), count);
    assert!(orders.iter().all(|o| o.status == status));
}

#[then(expr = "there are {int} orders from manufacturer {string}")]
async fn order_count_for_manufacturer(world: &mut BrokerageWorld, count: usize, manufacturer: String) {
    let manufacturer_id = world.manufacturer_id(&manufacturer);
    let query = OrderQueryFilter::default().with_manufacturer_id(manufacturer_id);
    let orders = world.orders().search_orders(world.account_id(), query).await.expect("Search failed");
    assert_eq!(orders.len(), count);
    assert!(orders.iter().all(|o| o.manufacturer_id == manufacturer_id));
}

//   there are 2 orders dated from "2024-03-01" until "2024-03-15"
#[then(expr = "there are {int} orders dated from {string} until {string}")]
async fn order_count_in_date_range(world: &mut BrokerageWorld, count: usize, since: String, until: String) {
    let since = parse_order_date(&since).expect("Invalid since date");
    let until = parse_order_date(&until).expect("Invalid until date");
    let query = OrderQueryFilter::default().since(since).until(until);
    let orders = world.orders().search_orders(world.account_id(), query).await.expect("Search failed");
    assert_eq!(orders.len(), count);
    assert!(orders.iter().all(|o| o.order_date >= since && o.order_date <= until));
}

#[then(expr = "the account has no quality named {string}")]
async fn no_quality(world: &mut BrokerageWorld, name: String) {
    let quality = world.accounts().quality_by_name(world.account_id(), &name).await.expect("Error fetching quality");
    assert!(quality.is_none(), "Quality {name} exists: {quality:?}");
}

#[then(expr = "the account has exactly one quality named {string}")]
async fn single_quality(world: &mut BrokerageWorld, name: String) {
    let quality = world
        .accounts()
        .quality_by_name(world.account_id(), &name)
        .await
        .expect("Error fetching quality")
        .expect("Quality does not exist");
    let query = OrderQueryFilter::default().with_quality_id(quality.id);
    let orders = world.orders().search_orders(world.account_id(), query).await.expect("Search failed");
    let all = world.orders().search_orders(world.account_id(), OrderQueryFilter::default()).await.expect("Search failed");
    assert_eq!(orders.len(), all.len(), "Orders are spread over more than one quality");
}

#[then(expr = "manufacturer {string} is displayed as {string}")]
async fn manufacturer_display_name(world: &mut BrokerageWorld, name: String, firm_name: String) {
    let manufacturer = world
        .system()
        .db
        .fetch_manufacturer(world.account_id(), world.manufacturer_id(&name))
        .await
        .expect("Error fetching manufacturer")
        .expect("Manufacturer does not exist");
    assert_eq!(manufacturer.firm_name.as_deref(), Some(firm_name.as_str()));
}

#[then(expr = "manufacturer {string} has no display name")]
async fn manufacturer_without_display_name(world: &mut BrokerageWorld, name: String) {
    let manufacturer = world
        .system()
        .db
        .fetch_manufacturer(world.account_id(), world.manufacturer_id(&name))
        .await
        .expect("Error fetching manufacturer")
        .expect("Manufacturer does not exist");
    assert_eq!(manufacturer.firm_name, None);
}
