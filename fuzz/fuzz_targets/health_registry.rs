#![no_main]

use arbitrary::Arbitrary;
use health_registry::{ContractError, HealthRegistryContract, HealthRegistryContractClient};
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{testutils::Address as _, Address, Env, String};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    RegisterPatient { who: u8, name_len: u8 },
    RegisterDoctor { who: u8 },
    Grant { patient: u8, doctor: u8 },
    Revoke { patient: u8, doctor: u8 },
    AddFile { who: u8, address_len: u8 },
    ReadFiles { caller: u8, patient: u8 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(HealthRegistryContract, ());
    let client = HealthRegistryContractClient::new(&env, &contract_id);

    let users: Vec<Address> = (0..6).map(|_| Address::generate(&env)).collect();
    let pick = |n: u8| &users[n as usize % users.len()];

    for action in actions {
        match action {
            FuzzAction::RegisterPatient { who, name_len } => {
                let name = "p".repeat(name_len as usize);
                let _ = client.try_register_patient(
                    pick(who),
                    &String::from_str(&env, &name),
                    &String::from_str(&env, "1990-01-01"),
                    &String::from_str(&env, "Male"),
                    &String::from_str(&env, "fuzz@example.com"),
                );
            }
            FuzzAction::RegisterDoctor { who } => {
                let _ = client.try_register_doctor(
                    pick(who),
                    &String::from_str(&env, "Dr. Fuzz"),
                    &String::from_str(&env, "000-000-0000"),
                    &String::from_str(&env, "General"),
                );
            }
            FuzzAction::Grant { patient, doctor } => {
                let _ = client.try_grant_access(pick(patient), pick(doctor));
            }
            FuzzAction::Revoke { patient, doctor } => {
                let _ = client.try_revoke_access(pick(patient), pick(doctor));
            }
            FuzzAction::AddFile { who, address_len } => {
                let content_address = "Q".repeat(address_len as usize);
                let _ = client.try_add_file(
                    pick(who),
                    &String::from_str(&env, "Fuzz Report"),
                    &String::from_str(&env, "PDF"),
                    &String::from_str(&env, &content_address),
                );
            }
            FuzzAction::ReadFiles { caller, patient } => {
                let caller = pick(caller);
                let patient = pick(patient);
                let allowed = caller == patient || client.has_access(patient, caller);
                match client.try_get_patient_files(caller, patient) {
                    Ok(_) => assert!(allowed, "read succeeded without a grant"),
                    Err(Ok(ContractError::AccessDenied)) => assert!(!allowed),
                    Err(Ok(ContractError::NotFound)) => assert!(!client.is_patient(patient)),
                    Err(other) => panic!("unexpected read failure: {:?}", other),
                }
            }
        }
    }
});
