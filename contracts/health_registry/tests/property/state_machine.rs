//! Model-based state machine test.
//!
//! Random operation sequences run against the contract and against a plain
//! in-memory model of the registry; every result, success or error, must
//! match the model, and the final state must agree for every identity.

use std::collections::{BTreeSet, HashMap, HashSet};

use health_registry::{ContractError, HealthRegistryContract, HealthRegistryContractClient};
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, Env, String};

const ACTORS: usize = 4;

#[derive(Arbitrary, Clone, Debug)]
enum Op {
    RegisterPatient {
        #[proptest(strategy = "0..ACTORS")]
        who: usize,
    },
    RegisterDoctor {
        #[proptest(strategy = "0..ACTORS")]
        who: usize,
    },
    Grant {
        #[proptest(strategy = "0..ACTORS")]
        patient: usize,
        #[proptest(strategy = "0..ACTORS")]
        doctor: usize,
    },
    Revoke {
        #[proptest(strategy = "0..ACTORS")]
        patient: usize,
        #[proptest(strategy = "0..ACTORS")]
        doctor: usize,
    },
    AddFile {
        #[proptest(strategy = "0..ACTORS")]
        who: usize,
        tag: u8,
    },
    ReadInfo {
        #[proptest(strategy = "0..ACTORS")]
        caller: usize,
        #[proptest(strategy = "0..ACTORS")]
        patient: usize,
    },
    ReadFiles {
        #[proptest(strategy = "0..ACTORS")]
        caller: usize,
        #[proptest(strategy = "0..ACTORS")]
        patient: usize,
    },
}

#[derive(Default)]
struct Model {
    patients: HashSet<usize>,
    doctors: HashSet<usize>,
    grants: HashMap<usize, BTreeSet<usize>>,
    files: HashMap<usize, std::vec::Vec<u8>>,
}

impl Model {
    fn register_patient(&mut self, who: usize) -> Result<(), ContractError> {
        if !self.patients.insert(who) {
            return Err(ContractError::AlreadyRegistered);
        }
        Ok(())
    }

    fn register_doctor(&mut self, who: usize) -> Result<(), ContractError> {
        if !self.doctors.insert(who) {
            return Err(ContractError::AlreadyRegistered);
        }
        Ok(())
    }

    fn grant(&mut self, patient: usize, doctor: usize) -> Result<(), ContractError> {
        if !self.patients.contains(&patient) {
            return Err(ContractError::NotFound);
        }
        self.grants.entry(patient).or_default().insert(doctor);
        Ok(())
    }

    fn revoke(&mut self, patient: usize, doctor: usize) -> Result<(), ContractError> {
        if !self.patients.contains(&patient) {
            return Err(ContractError::NotFound);
        }
        if let Some(set) = self.grants.get_mut(&patient) {
            set.remove(&doctor);
        }
        Ok(())
    }

    fn add_file(&mut self, who: usize, tag: u8) -> Result<u32, ContractError> {
        if !self.patients.contains(&who) {
            return Err(ContractError::NotFound);
        }
        let files = self.files.entry(who).or_default();
        files.push(tag);
        Ok(files.len() as u32)
    }

    fn has_access(&self, patient: usize, doctor: usize) -> bool {
        self.grants
            .get(&patient)
            .map_or(false, |set| set.contains(&doctor))
    }

    fn read_gate(&self, caller: usize, patient: usize) -> Result<(), ContractError> {
        if !self.patients.contains(&patient) {
            return Err(ContractError::NotFound);
        }
        if caller != patient && !self.has_access(patient, caller) {
            return Err(ContractError::AccessDenied);
        }
        Ok(())
    }
}

fn content_address(tag: u8) -> std::string::String {
    format!("Qm{:03}", tag)
}

/// Collapses a client `try_*` result down to the contract error, if any.
fn outcome<T, E1, E2: core::fmt::Debug>(
    res: Result<Result<T, E1>, Result<ContractError, E2>>,
) -> Result<T, ContractError> {
    match res {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(_)) => panic!("return value failed to convert"),
        Err(Ok(error)) => Err(error),
        Err(Err(e)) => panic!("host invocation error: {:?}", e),
    }
}

fn run(ops: &[Op]) -> Result<(), TestCaseError> {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(HealthRegistryContract, ());
    let client = HealthRegistryContractClient::new(&env, &contract_id);

    let actors: std::vec::Vec<Address> = (0..ACTORS).map(|_| Address::generate(&env)).collect();
    let text = |value: &str| String::from_str(&env, value);
    let mut model = Model::default();

    for op in ops {
        match op.clone() {
            Op::RegisterPatient { who } => {
                let actual = outcome(client.try_register_patient(
                    &actors[who],
                    &text("Patient"),
                    &text("1990-01-01"),
                    &text("Male"),
                    &text("patient@example.com"),
                ));
                prop_assert_eq!(actual, model.register_patient(who));
            }
            Op::RegisterDoctor { who } => {
                let actual = outcome(client.try_register_doctor(
                    &actors[who],
                    &text("Dr. Model"),
                    &text("123-456-7890"),
                    &text("Cardiology"),
                ));
                prop_assert_eq!(actual, model.register_doctor(who));
            }
            Op::Grant { patient, doctor } => {
                let actual = outcome(client.try_grant_access(&actors[patient], &actors[doctor]));
                prop_assert_eq!(actual, model.grant(patient, doctor));
            }
            Op::Revoke { patient, doctor } => {
                let actual = outcome(client.try_revoke_access(&actors[patient], &actors[doctor]));
                prop_assert_eq!(actual, model.revoke(patient, doctor));
            }
            Op::AddFile { who, tag } => {
                let actual = outcome(client.try_add_file(
                    &actors[who],
                    &text("Report"),
                    &text("PDF"),
                    &text(&content_address(tag)),
                ));
                prop_assert_eq!(actual, model.add_file(who, tag));
            }
            Op::ReadInfo { caller, patient } => {
                let actual =
                    outcome(client.try_get_patient_info(&actors[caller], &actors[patient]));
                prop_assert_eq!(actual.map(|_| ()), model.read_gate(caller, patient));
            }
            Op::ReadFiles { caller, patient } => {
                let actual =
                    outcome(client.try_get_patient_files(&actors[caller], &actors[patient]));
                let expected = model.read_gate(caller, patient);
                prop_assert_eq!(actual.is_ok(), expected.is_ok());
                match actual {
                    Ok(files) => {
                        let tags = model.files.get(&patient).cloned().unwrap_or_default();
                        prop_assert_eq!(files.len() as usize, tags.len());
                        for (i, tag) in tags.iter().enumerate() {
                            let file = files.get(i as u32).unwrap();
                            prop_assert_eq!(file.content_address, text(&content_address(*tag)));
                        }
                    }
                    Err(error) => prop_assert_eq!(Err(error), expected),
                }
            }
        }
    }

    for (p, patient) in actors.iter().enumerate() {
        prop_assert_eq!(client.is_patient(patient), model.patients.contains(&p));
        prop_assert_eq!(client.is_doctor(patient), model.doctors.contains(&p));
        for (d, doctor) in actors.iter().enumerate() {
            prop_assert_eq!(client.has_access(patient, doctor), model.has_access(p, d));
        }
        if model.patients.contains(&p) {
            let expected = model.grants.get(&p).map_or(0, |set| set.len());
            prop_assert_eq!(client.get_grantees(patient, patient).len() as usize, expected);
        }
    }
    prop_assert_eq!(client.get_patient_count() as usize, model.patients.len());
    prop_assert_eq!(client.get_doctor_count() as usize, model.doctors.len());

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_contract_matches_model(ops in prop::collection::vec(any::<Op>(), 1..24)) {
        run(&ops)?;
    }
}
