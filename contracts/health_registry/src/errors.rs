use crate::events;
use soroban_sdk::{contracterror, contracttype, log, Address, Env, String};

/// Error categories for classifying different types of errors
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Validation errors: calls that do not fit the contract lifecycle
    Validation = 1,
    /// Authorization errors: identity and consent failures
    Authorization = 2,
    /// Not found errors: patient or doctor lookup failures
    NotFound = 3,
    /// State conflict errors: duplicate registrations
    StateConflict = 4,
    /// System errors: contract-level issues like pausing
    System = 5,
}

/// Error severity levels indicating the impact and urgency of errors
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorSeverity {
    /// Low severity: non-critical errors, informational
    Low = 1,
    /// Medium severity: important but recoverable errors
    Medium = 2,
    /// High severity: significant errors requiring attention
    High = 3,
    /// Critical severity: system-level failures requiring immediate action
    Critical = 4,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ErrorContext {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub message: String,
    pub user: Option<Address>,
    pub resource_id: Option<String>,
    pub timestamp: u64,
    pub retryable: bool,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    AlreadyRegistered = 4,
    NotFound = 5,
    AccessDenied = 6,
    Paused = 7,
}

impl ContractError {
    /// Returns the error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized | ContractError::AlreadyInitialized => {
                ErrorCategory::Validation
            }
            ContractError::Unauthorized | ContractError::AccessDenied => {
                ErrorCategory::Authorization
            }
            ContractError::NotFound => ErrorCategory::NotFound,
            ContractError::AlreadyRegistered => ErrorCategory::StateConflict,
            ContractError::Paused => ErrorCategory::System,
        }
    }

    /// Returns the severity level for this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::NotFound => ErrorSeverity::Low,
            ContractError::AlreadyRegistered => ErrorSeverity::Medium,
            ContractError::Unauthorized | ContractError::AccessDenied => ErrorSeverity::High,
            ContractError::Paused => ErrorSeverity::Critical,
        }
    }

    /// Registry failures are deterministic: repeating the same call against
    /// the same state fails the same way.
    pub fn retryable(&self) -> bool {
        false
    }

    /// Returns a human-readable error message for this error.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::NotInitialized => "Contract has not been initialized",
            ContractError::AlreadyInitialized => "Contract is already initialized",
            ContractError::Unauthorized => "Caller is not the registry admin",
            ContractError::AlreadyRegistered => "Identity is already registered",
            ContractError::NotFound => "No registration found for identity",
            ContractError::AccessDenied => "Caller has no access grant from this patient",
            ContractError::Paused => "Operation is currently paused",
        }
    }
}

/// Creates an ErrorContext from an error and optional user/resource information.
pub fn create_error_context(
    env: &Env,
    error: ContractError,
    user: Option<Address>,
    resource_id: Option<String>,
) -> ErrorContext {
    ErrorContext {
        category: error.category(),
        severity: error.severity(),
        message: String::from_str(env, error.message()),
        user,
        resource_id,
        timestamp: env.ledger().timestamp(),
        retryable: error.retryable(),
    }
}

/// Emits a diagnostic line and an `ERROR` event for `error`, then hands the
/// error back so entry points can `return Err(report(..))`.
///
/// The failing invocation rolls back its contract events together with its
/// storage writes, so the `ERROR` event only shows up in diagnostic output
/// (simulation, test harnesses). The `log!` line is the same: a diagnostic
/// event, not ledger state.
pub fn report(
    env: &Env,
    error: ContractError,
    user: Option<Address>,
    resource: &str,
) -> ContractError {
    let resource = String::from_str(env, resource);
    log!(env, "{} failed with code {}", resource.clone(), error as u32);
    let context = create_error_context(env, error, user, Some(resource));
    events::publish_error(env, error as u32, context);
    error
}
