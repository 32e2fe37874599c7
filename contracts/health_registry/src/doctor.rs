use crate::extend_ttl;
use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol};

const DOCTOR_COUNT: Symbol = symbol_short!("DOC_CNT");

/// Doctor profile. Publicly readable and immutable once registered.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DoctorProfile {
    pub name: String,
    pub phone: String,
    pub specialty: String,
    pub registered_at: u64,
}

fn doctor_key(doctor: &Address) -> (Symbol, Address) {
    (symbol_short!("DOCTOR"), doctor.clone())
}

pub fn is_registered(env: &Env, doctor: &Address) -> bool {
    env.storage().persistent().has(&doctor_key(doctor))
}

pub fn get_profile(env: &Env, doctor: &Address) -> Option<DoctorProfile> {
    let key = doctor_key(doctor);
    let profile = env.storage().persistent().get(&key);
    if profile.is_some() {
        extend_ttl(env, &key);
    }
    profile
}

pub fn create_profile(env: &Env, doctor: &Address, profile: &DoctorProfile) {
    let key = doctor_key(doctor);
    env.storage().persistent().set(&key, profile);
    extend_ttl(env, &key);

    let count: u64 = env.storage().instance().get(&DOCTOR_COUNT).unwrap_or(0);
    env.storage()
        .instance()
        .set(&DOCTOR_COUNT, &count.saturating_add(1));
}

pub fn count(env: &Env) -> u64 {
    env.storage().instance().get(&DOCTOR_COUNT).unwrap_or(0)
}
