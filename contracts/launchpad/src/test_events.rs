extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{
    BatchExecuted, Invested, OwnershipTransferred, ProjectClosed, ProjectOpened, BATCH_KIND_COIN,
    BATCH_KIND_TOKEN,
};
use crate::{LaunchPad, LaunchPadClient, SCALE};

fn setup() -> (Env, LaunchPadClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let owner = Address::generate(&env);
    let native = env.register_stellar_asset_contract_v2(owner.clone());
    let contract_id = env.register(LaunchPad, ());
    let client = LaunchPadClient::new(&env, &contract_id);
    client.init(&owner, &native.address());
    (env, client, owner, native.address())
}

fn mint(env: &Env, asset: &Address, to: &Address, amount: i128) {
    token::StellarAssetClient::new(env, asset).mint(to, &amount);
}

/// Register metadata and open a round keyed `LPT`, returning the payout
/// token address.
fn open_round(env: &Env, client: &LaunchPadClient, owner: &Address) -> Address {
    let symbol = symbol_short!("LPT");
    let payout_token = env
        .register_stellar_asset_contract_v2(owner.clone())
        .address();
    client.set_project_meta(
        owner,
        &symbol,
        &String::from_str(env, "LaunchPad Project"),
        &0u32,
        &1i128,
        &10i128,
    );
    client.set_token_meta_data(owner, &symbol, &payout_token, &100i128, &(2 * SCALE));
    client.open_project(owner, &symbol, owner);
    payout_token
}

#[test]
fn test_project_opened_event() {
    let (env, client, owner, _native) = setup();
    let symbol = symbol_short!("LPT");
    open_round(&env, &client, &owner);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("opened").into_val(&env),
        symbol.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ProjectOpened = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ProjectOpened {
            recipient: owner.clone(),
        }
    );
}

#[test]
fn test_invested_event() {
    let (env, client, owner, native) = setup();
    let symbol = symbol_short!("LPT");
    open_round(&env, &client, &owner);

    let investor = Address::generate(&env);
    mint(&env, &native, &investor, 10);
    client.investment(&investor, &symbol, &2);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("invested").into_val(&env),
        symbol.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Invested = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Invested {
            investor: investor.clone(),
            amount: 2,
            invest_user_num: 1,
        }
    );
}

#[test]
fn test_project_closed_events() {
    let (env, client, owner, native) = setup();
    let symbol = symbol_short!("LPT");
    let payout_token = open_round(&env, &client, &owner);

    let investor = Address::generate(&env);
    mint(&env, &native, &investor, 10);
    client.investment(&investor, &symbol, &2);

    mint(&env, &payout_token, &client.address, 200);
    client.close_project_success(&owner, &symbol);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("closed").into_val(&env),
        symbol.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: ProjectClosed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data, ProjectClosed { succeed: true });

    // Failure close on a second round publishes succeed = false.
    let (env, client, owner, _native) = setup();
    open_round(&env, &client, &owner);
    client.close_project_fail(&owner, &symbol);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let event_data: ProjectClosed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data, ProjectClosed { succeed: false });
}

#[test]
fn test_batch_executed_events() {
    let (env, client, owner, native) = setup();
    let symbol = symbol_short!("LPT");
    let payout_token = open_round(&env, &client, &owner);

    let investor = Address::generate(&env);
    mint(&env, &native, &investor, 10);
    client.investment(&investor, &symbol, &2);

    mint(&env, &payout_token, &client.address, 200);
    client.close_project_success(&owner, &symbol);
    client.execute_batch_air_drop_token(&symbol, &0);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let expected_topics = vec![
        &env,
        symbol_short!("batch").into_val(&env),
        symbol.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);
    let event_data: BatchExecuted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        BatchExecuted {
            batch_index: 0,
            kind: BATCH_KIND_TOKEN,
        }
    );

    // Coin refund batches carry the other kind marker.
    let (env, client, owner, native) = setup();
    open_round(&env, &client, &owner);
    let investor = Address::generate(&env);
    mint(&env, &native, &investor, 10);
    client.investment(&investor, &symbol, &2);
    client.close_project_fail(&owner, &symbol);
    client.execute_batch_air_drop_coin(&symbol, &0);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");
    let event_data: BatchExecuted = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        BatchExecuted {
            batch_index: 0,
            kind: BATCH_KIND_COIN,
        }
    );
}

#[test]
fn test_ownership_transferred_event() {
    let (env, client, owner, _native) = setup();
    let new_owner = Address::generate(&env);

    client.transfer_ownership(&owner, &new_owner);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("owner").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: OwnershipTransferred = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        OwnershipTransferred {
            old_owner: owner.clone(),
            new_owner: new_owner.clone(),
        }
    );
}
