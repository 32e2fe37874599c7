//! Patient → identity access grants.
//!
//! Each grant lives under its own `(ACCESS, patient, doctor)` key so the
//! membership check behind every protected read is a single lookup. Grant
//! order is kept as a doubly linked list threaded through per-pair
//! `(GRT_LINK, patient, doctor)` entries with `GRT_HEAD`/`GRT_TAIL` pointers,
//! so granting and revoking touch a fixed number of entries however many
//! grants a patient holds. Both are written by the same call, so they never
//! disagree.

use crate::extend_ttl;
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

/// Access grant structure
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessGrant {
    pub patient: Address,
    pub doctor: Address,
    pub granted_at: u64,
}

/// Neighbours of a grant in its patient's grant order.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GrantLink {
    pub prev: Option<Address>,
    pub next: Option<Address>,
}

fn access_key(patient: &Address, doctor: &Address) -> (Symbol, Address, Address) {
    (symbol_short!("ACCESS"), patient.clone(), doctor.clone())
}

fn link_key(patient: &Address, doctor: &Address) -> (Symbol, Address, Address) {
    (symbol_short!("GRT_LINK"), patient.clone(), doctor.clone())
}

fn head_key(patient: &Address) -> (Symbol, Address) {
    (symbol_short!("GRT_HEAD"), patient.clone())
}

fn tail_key(patient: &Address) -> (Symbol, Address) {
    (symbol_short!("GRT_TAIL"), patient.clone())
}

fn link(env: &Env, patient: &Address, doctor: &Address) -> GrantLink {
    env.storage()
        .persistent()
        .get(&link_key(patient, doctor))
        .unwrap_or_default()
}

fn set_link(env: &Env, patient: &Address, doctor: &Address, link: &GrantLink) {
    let key = link_key(patient, doctor);
    env.storage().persistent().set(&key, link);
    extend_ttl(env, &key);
}

/// Points a head or tail key at `target`, or clears it.
fn set_end(env: &Env, key: &(Symbol, Address), target: &Option<Address>) {
    match target {
        Some(doctor) => {
            env.storage().persistent().set(key, doctor);
            extend_ttl(env, key);
        }
        None => env.storage().persistent().remove(key),
    }
}

pub fn has_access(env: &Env, patient: &Address, doctor: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&access_key(patient, doctor))
}

/// A protected read is allowed for the patient itself or for any identity
/// the patient granted.
pub fn can_read(env: &Env, patient: &Address, caller: &Address) -> bool {
    caller == patient || has_access(env, patient, caller)
}

/// Records a grant. Returns `false` when the grant already existed, in which
/// case nothing is written.
pub fn grant(env: &Env, patient: &Address, doctor: &Address) -> bool {
    let key = access_key(patient, doctor);
    if env.storage().persistent().has(&key) {
        return false;
    }

    let grant = AccessGrant {
        patient: patient.clone(),
        doctor: doctor.clone(),
        granted_at: env.ledger().timestamp(),
    };
    env.storage().persistent().set(&key, &grant);
    extend_ttl(env, &key);

    let tail: Option<Address> = env.storage().persistent().get(&tail_key(patient));
    match &tail {
        Some(last) => {
            let mut last_link = link(env, patient, last);
            last_link.next = Some(doctor.clone());
            set_link(env, patient, last, &last_link);
        }
        None => set_end(env, &head_key(patient), &Some(doctor.clone())),
    }
    set_link(
        env,
        patient,
        doctor,
        &GrantLink {
            prev: tail,
            next: None,
        },
    );
    set_end(env, &tail_key(patient), &Some(doctor.clone()));

    true
}

/// Removes a grant. Returns `false` when there was nothing to remove.
pub fn revoke(env: &Env, patient: &Address, doctor: &Address) -> bool {
    let key = access_key(patient, doctor);
    if !env.storage().persistent().has(&key) {
        return false;
    }
    env.storage().persistent().remove(&key);

    let removed = link(env, patient, doctor);
    match &removed.prev {
        Some(prev) => {
            let mut prev_link = link(env, patient, prev);
            prev_link.next = removed.next.clone();
            set_link(env, patient, prev, &prev_link);
        }
        None => set_end(env, &head_key(patient), &removed.next),
    }
    match &removed.next {
        Some(next) => {
            let mut next_link = link(env, patient, next);
            next_link.prev = removed.prev.clone();
            set_link(env, patient, next, &next_link);
        }
        None => set_end(env, &tail_key(patient), &removed.prev),
    }
    env.storage().persistent().remove(&link_key(patient, doctor));

    true
}

/// Current grant set in the order the grants were made.
pub fn grantees(env: &Env, patient: &Address) -> Vec<Address> {
    let mut list = Vec::new(env);
    let mut cursor: Option<Address> = env.storage().persistent().get(&head_key(patient));
    while let Some(current) = cursor {
        cursor = link(env, patient, &current).next;
        list.push_back(current);
    }
    list
}
