//! Per-patient append-only file log.
//!
//! Each file sits under its own `(FILE, patient, index)` key next to a
//! `(FILE_CNT, patient)` counter, so an append writes one bounded entry no
//! matter how long the patient's history already is.

use crate::extend_ttl;
use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

/// Metadata for a file held in external content-addressed storage. The
/// registry never dereferences `content_address`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MedicalFile {
    pub file_name: String,
    pub file_type: String,
    pub content_address: String,
    pub uploaded_at: u64,
}

fn file_key(patient: &Address, index: u32) -> (Symbol, Address, u32) {
    (symbol_short!("FILE"), patient.clone(), index)
}

fn count_key(patient: &Address) -> (Symbol, Address) {
    (symbol_short!("FILE_CNT"), patient.clone())
}

pub fn count(env: &Env, patient: &Address) -> u32 {
    env.storage()
        .persistent()
        .get(&count_key(patient))
        .unwrap_or(0)
}

/// The patient's files in upload order.
pub fn list(env: &Env, patient: &Address) -> Vec<MedicalFile> {
    let total = count(env, patient);
    let mut files = Vec::new(env);
    if total == 0 {
        return files;
    }
    extend_ttl(env, &count_key(patient));

    for index in 0..total {
        let key = file_key(patient, index);
        if let Some(file) = env.storage().persistent().get::<_, MedicalFile>(&key) {
            extend_ttl(env, &key);
            files.push_back(file);
        }
    }
    files
}

/// Appends `file` and returns the patient's new file count.
pub fn append(env: &Env, patient: &Address, file: MedicalFile) -> u32 {
    let index = count(env, patient);
    let key = file_key(patient, index);
    env.storage().persistent().set(&key, &file);
    extend_ttl(env, &key);

    let total = index.saturating_add(1);
    let count_key = count_key(patient);
    env.storage().persistent().set(&count_key, &total);
    extend_ttl(env, &count_key);
    total
}
