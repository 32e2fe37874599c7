#![allow(dead_code)]

use health_registry::{HealthRegistryContract, HealthRegistryContractClient};
use soroban_sdk::{testutils::Address as _, Address, Env, String};

pub struct TestContext {
    pub env: Env,
    pub client: HealthRegistryContractClient<'static>,
}

/// Creates a mocked Soroban environment and deploys a fresh registry.
pub fn setup_test_env() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(HealthRegistryContract, ());
    let client = HealthRegistryContractClient::new(&env, &contract_id);

    TestContext { env, client }
}

pub fn s(ctx: &TestContext, value: &str) -> String {
    String::from_str(&ctx.env, value)
}

/// Registers a fresh address as a patient and returns it.
pub fn create_test_patient(ctx: &TestContext, name: &str) -> Address {
    let patient = Address::generate(&ctx.env);
    ctx.client.register_patient(
        &patient,
        &s(ctx, name),
        &s(ctx, "1990-01-01"),
        &s(ctx, "Male"),
        &s(ctx, "patient@example.com"),
    );
    patient
}

/// Registers a fresh address as a doctor and returns it.
pub fn create_test_doctor(ctx: &TestContext, name: &str, specialty: &str) -> Address {
    let doctor = Address::generate(&ctx.env);
    ctx.client
        .register_doctor(&doctor, &s(ctx, name), &s(ctx, "123-456-7890"), &s(ctx, specialty));
    doctor
}

/// Appends a file for `patient` and returns the new file count.
pub fn add_test_file(
    ctx: &TestContext,
    patient: &Address,
    name: &str,
    content_address: &str,
) -> u32 {
    ctx.client
        .add_file(patient, &s(ctx, name), &s(ctx, "PDF"), &s(ctx, content_address))
}
