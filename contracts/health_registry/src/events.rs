use crate::circuit_breaker::PauseScope;
use crate::errors::ErrorContext;
use soroban_sdk::{symbol_short, Address, Env, String};

/// Event published when the contract is initialized.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Event published when a patient registers.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatientRegisteredEvent {
    pub patient: Address,
    pub name: String,
    pub timestamp: u64,
}

/// Event published when a doctor registers.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DoctorRegisteredEvent {
    pub doctor: Address,
    pub name: String,
    pub specialty: String,
    pub timestamp: u64,
}

/// Event published when a patient grants access to an identity.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessGrantedEvent {
    pub patient: Address,
    pub doctor: Address,
    pub timestamp: u64,
}

/// Event published when a patient revokes a grant.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessRevokedEvent {
    pub patient: Address,
    pub doctor: Address,
    pub timestamp: u64,
}

/// Event published when a patient appends a file.
/// The content address stays out of the event stream.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileAddedEvent {
    pub patient: Address,
    pub index: u32,
    pub file_type: String,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseEvent {
    pub admin: Address,
    pub scope: PauseScope,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, admin: Address) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a new patient is registered.
pub fn publish_patient_registered(env: &Env, patient: Address, name: String) {
    let topics = (symbol_short!("PAT_REG"), patient.clone());
    let data = PatientRegisteredEvent {
        patient,
        name,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a new doctor is registered.
pub fn publish_doctor_registered(env: &Env, doctor: Address, name: String, specialty: String) {
    let topics = (symbol_short!("DOC_REG"), doctor.clone());
    let data = DoctorRegisteredEvent {
        doctor,
        name,
        specialty,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_access_granted(env: &Env, patient: Address, doctor: Address) {
    let topics = (symbol_short!("ACC_GRT"), patient.clone(), doctor.clone());
    let data = AccessGrantedEvent {
        patient,
        doctor,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_access_revoked(env: &Env, patient: Address, doctor: Address) {
    let topics = (symbol_short!("ACC_REV"), patient.clone(), doctor.clone());
    let data = AccessRevokedEvent {
        patient,
        doctor,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an event when a file is appended; `index` is the file's
/// position in the patient's list.
pub fn publish_file_added(env: &Env, patient: Address, index: u32, file_type: String) {
    let topics = (symbol_short!("FILE_ADD"), patient.clone());
    let data = FileAddedEvent {
        patient,
        index,
        file_type,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_paused(env: &Env, admin: Address, scope: PauseScope) {
    let topics = (symbol_short!("PAUSED"), admin.clone());
    let data = PauseEvent {
        admin,
        scope,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_resumed(env: &Env, admin: Address, scope: PauseScope) {
    let topics = (symbol_short!("RESUMED"), admin.clone());
    let data = PauseEvent {
        admin,
        scope,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Publishes an error event for monitoring and indexing.
pub fn publish_error(env: &Env, error_code: u32, context: ErrorContext) {
    let topics = (
        symbol_short!("ERROR"),
        context.category.clone(),
        context.severity.clone(),
    );
    let data = (
        error_code,
        context.message,
        context.user,
        context.resource_id,
        context.retryable,
        context.timestamp,
    );
    env.events().publish(topics, data);
}
