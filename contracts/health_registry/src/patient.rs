use crate::extend_ttl;
use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol};

const PATIENT_COUNT: Symbol = symbol_short!("PAT_CNT");

/// Patient profile. Only the patient's own address may create it; there is
/// no update path.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientProfile {
    pub name: String,
    pub date_of_birth: String,
    pub sex: String,
    pub email: String,
    pub registered_at: u64,
}

fn patient_key(patient: &Address) -> (Symbol, Address) {
    (symbol_short!("PATIENT"), patient.clone())
}

pub fn is_registered(env: &Env, patient: &Address) -> bool {
    env.storage().persistent().has(&patient_key(patient))
}

pub fn get_profile(env: &Env, patient: &Address) -> Option<PatientProfile> {
    let key = patient_key(patient);
    let profile = env.storage().persistent().get(&key);
    if profile.is_some() {
        extend_ttl(env, &key);
    }
    profile
}

/// Stores a new profile and bumps the registration counter. Callers check
/// `is_registered` first.
pub fn create_profile(env: &Env, patient: &Address, profile: &PatientProfile) {
    let key = patient_key(patient);
    env.storage().persistent().set(&key, profile);
    extend_ttl(env, &key);

    let count: u64 = env.storage().instance().get(&PATIENT_COUNT).unwrap_or(0);
    env.storage()
        .instance()
        .set(&PATIENT_COUNT, &count.saturating_add(1));
}

pub fn count(env: &Env) -> u64 {
    env.storage().instance().get(&PATIENT_COUNT).unwrap_or(0)
}
