use crate::{events, ContractError};
use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// ── Types ─────────────────────────────────────────────────────

/// Defines the scope of the pause mechanism
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PauseScope {
    /// Halts every mutating registry operation
    Global,
    /// Halts a single operation, named by its function symbol
    Function(Symbol),
}

pub const REGISTER_PATIENT: Symbol = symbol_short!("REG_PAT");
pub const REGISTER_DOCTOR: Symbol = symbol_short!("REG_DOC");
pub const GRANT_ACCESS: Symbol = symbol_short!("GRT_ACC");
pub const REVOKE_ACCESS: Symbol = symbol_short!("REV_ACC");
pub const ADD_FILE: Symbol = symbol_short!("ADD_FILE");

// ── Storage Keys ─────────────────────────────────────────────

fn global_pause_key() -> Symbol {
    symbol_short!("P_GLOB")
}

fn function_pause_key(func: &Symbol) -> (Symbol, Symbol) {
    (symbol_short!("P_FUNC"), func.clone())
}

// ── Core ─────────────────────────────────────────────────────

pub fn is_paused(env: &Env, scope: &PauseScope) -> bool {
    let global = env
        .storage()
        .instance()
        .get(&global_pause_key())
        .unwrap_or(false);
    if global {
        return true;
    }

    match scope {
        PauseScope::Global => false,
        PauseScope::Function(func_name) => env
            .storage()
            .instance()
            .get(&function_pause_key(func_name))
            .unwrap_or(false),
    }
}

/// Fails with `Paused` when either the global breaker or the breaker for
/// `func` is engaged.
pub fn require_not_paused(env: &Env, func: Symbol) -> Result<(), ContractError> {
    if is_paused(env, &PauseScope::Function(func)) {
        return Err(ContractError::Paused);
    }
    Ok(())
}

fn set_paused(env: &Env, scope: &PauseScope, paused: bool) {
    match scope {
        PauseScope::Global => {
            env.storage().instance().set(&global_pause_key(), &paused);
        }
        PauseScope::Function(func_name) => {
            env.storage()
                .instance()
                .set(&function_pause_key(func_name), &paused);
        }
    }
}

/// Engages a circuit breaker. `admin` must already be checked by the caller.
pub fn pause(env: &Env, admin: Address, scope: PauseScope) {
    set_paused(env, &scope, true);
    events::publish_paused(env, admin, scope);
}

/// Releases a circuit breaker. `admin` must already be checked by the caller.
pub fn resume(env: &Env, admin: Address, scope: PauseScope) {
    set_paused(env, &scope, false);
    events::publish_resumed(env, admin, scope);
}
