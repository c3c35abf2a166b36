use brokerage_engine::db_types::{CommissionConfig, NewCustomer, NewManufacturer};
use cucumber::given;
use rust_decimal::Decimal;

use crate::cucumber::{brokerage_world::BrokerageSystem, BrokerageWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut BrokerageWorld) {
    let system = BrokerageSystem::new().await;
    world.system = Some(system);
}

#[given(expr = "a broker account {string}")]
async fn broker_account(world: &mut BrokerageWorld, name: String) {
    let account = world.accounts().create_account(&name).await.expect("Error creating account");
    assert_eq!(account.order_counter, 0);
    world.account_id = Some(account.id);
}

#[given(expr = "a customer {string} with a {word} percent commission")]
async fn percent_customer(world: &mut BrokerageWorld, name: String, percent: String) {
    let percent = percent.parse::<Decimal>().expect("Invalid percentage");
    add_customer(world, name, CommissionConfig::Percent { percent }).await;
}

#[given(expr = "a customer {string} with a LOT commission of {word} per unit")]
async fn lot_customer(world: &mut BrokerageWorld, name: String, rate: String) {
    let rate = rate.parse::<Decimal>().expect("Invalid lot rate");
    add_customer(world, name, CommissionConfig::Lot { rate }).await;
}

async fn add_customer(world: &mut BrokerageWorld, name: String, commission: CommissionConfig) {
    let customer = NewCustomer::new(name.as_str(), commission).with_contact_details("24AAACR5055K1Z5", "Surat", "0261");
    let customer =
        world.accounts().register_customer(world.account_id(), customer).await.expect("Error creating customer");
    assert_eq!(customer.commission, commission);
    world.customers.insert(name, customer.id);
}

#[given(expr = "a manufacturer {string}")]
async fn manufacturer(world: &mut BrokerageWorld, name: String) {
    let manufacturer = world
        .accounts()
        .register_manufacturer(world.account_id(), NewManufacturer::new(name.as_str()))
        .await
        .expect("Error creating manufacturer");
    world.manufacturers.insert(name, manufacturer.id);
}
