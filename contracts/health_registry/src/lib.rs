#![no_std]
pub mod access;
pub mod circuit_breaker;
pub mod doctor;
pub mod errors;
pub mod events;
pub mod files;
pub mod patient;

use soroban_sdk::{
    contract, contractimpl, symbol_short, Address, Env, IntoVal, String, Symbol, Val, Vec,
};

pub use access::AccessGrant;
pub use circuit_breaker::PauseScope;
pub use doctor::DoctorProfile;
pub use errors::{create_error_context, ContractError, ErrorCategory, ErrorContext, ErrorSeverity};
pub use files::MedicalFile;
pub use patient::PatientProfile;

/// Storage keys for the contract
const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");

const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 3_110_400;

/// Extends the time-to-live (TTL) for a persistent storage key.
pub(crate) fn extend_ttl<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Extends the TTL of instance storage (admin, breakers, counters).
fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

#[contract]
pub struct HealthRegistryContract;

impl HealthRegistryContract {
    fn require_admin(env: &Env, caller: &Address, resource: &str) -> Result<(), ContractError> {
        let admin: Address = env.storage().instance().get(&ADMIN).ok_or_else(|| {
            errors::report(env, ContractError::NotInitialized, Some(caller.clone()), resource)
        })?;
        if *caller != admin {
            return Err(errors::report(
                env,
                ContractError::Unauthorized,
                Some(caller.clone()),
                resource,
            ));
        }
        Ok(())
    }

    fn require_not_paused(
        env: &Env,
        func: Symbol,
        caller: &Address,
        resource: &str,
    ) -> Result<(), ContractError> {
        circuit_breaker::require_not_paused(env, func)
            .map_err(|e| errors::report(env, e, Some(caller.clone()), resource))
    }
}

#[contractimpl]
impl HealthRegistryContract {
    /// Initialize the contract with an admin address. Optional: the registry
    /// operations work without it, but the circuit breaker needs an admin.
    pub fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(errors::report(
                &env,
                ContractError::AlreadyInitialized,
                Some(admin),
                "initialize",
            ));
        }

        admin.require_auth();

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        extend_instance_ttl(&env);

        events::publish_initialized(&env, admin);

        Ok(())
    }

    /// Get the admin address
    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    /// Check if the contract is initialized
    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ======================== Registration ========================

    /// Registers the caller as a patient. The first registration wins; a
    /// second call fails with `AlreadyRegistered` and leaves the profile as is.
    pub fn register_patient(
        env: Env,
        caller: Address,
        name: String,
        date_of_birth: String,
        sex: String,
        email: String,
    ) -> Result<(), ContractError> {
        Self::require_not_paused(
            &env,
            circuit_breaker::REGISTER_PATIENT,
            &caller,
            "register_patient",
        )?;
        caller.require_auth();

        if patient::is_registered(&env, &caller) {
            return Err(errors::report(
                &env,
                ContractError::AlreadyRegistered,
                Some(caller),
                "register_patient",
            ));
        }

        let profile = PatientProfile {
            name: name.clone(),
            date_of_birth,
            sex,
            email,
            registered_at: env.ledger().timestamp(),
        };
        patient::create_profile(&env, &caller, &profile);
        extend_instance_ttl(&env);

        events::publish_patient_registered(&env, caller, name);

        Ok(())
    }

    /// Registers the caller as a doctor, independently of any patient
    /// registration held by the same address.
    pub fn register_doctor(
        env: Env,
        caller: Address,
        name: String,
        phone: String,
        specialty: String,
    ) -> Result<(), ContractError> {
        Self::require_not_paused(
            &env,
            circuit_breaker::REGISTER_DOCTOR,
            &caller,
            "register_doctor",
        )?;
        caller.require_auth();

        if doctor::is_registered(&env, &caller) {
            return Err(errors::report(
                &env,
                ContractError::AlreadyRegistered,
                Some(caller),
                "register_doctor",
            ));
        }

        let profile = DoctorProfile {
            name: name.clone(),
            phone,
            specialty: specialty.clone(),
            registered_at: env.ledger().timestamp(),
        };
        doctor::create_profile(&env, &caller, &profile);
        extend_instance_ttl(&env);

        events::publish_doctor_registered(&env, caller, name, specialty);

        Ok(())
    }

    /// Returns a patient's profile to the patient or to an identity the
    /// patient granted access.
    pub fn get_patient_info(
        env: Env,
        caller: Address,
        patient: Address,
    ) -> Result<PatientProfile, ContractError> {
        caller.require_auth();

        let profile = patient::get_profile(&env, &patient).ok_or_else(|| {
            errors::report(
                &env,
                ContractError::NotFound,
                Some(patient.clone()),
                "get_patient_info",
            )
        })?;

        if !access::can_read(&env, &patient, &caller) {
            return Err(errors::report(
                &env,
                ContractError::AccessDenied,
                Some(caller),
                "get_patient_info",
            ));
        }

        Ok(profile)
    }

    /// Doctor profiles are public.
    pub fn get_doctor_info(env: Env, doctor: Address) -> Result<DoctorProfile, ContractError> {
        doctor::get_profile(&env, &doctor).ok_or_else(|| {
            errors::report(&env, ContractError::NotFound, Some(doctor), "get_doctor_info")
        })
    }

    pub fn is_patient(env: Env, identity: Address) -> bool {
        patient::is_registered(&env, &identity)
    }

    pub fn is_doctor(env: Env, identity: Address) -> bool {
        doctor::is_registered(&env, &identity)
    }

    pub fn get_patient_count(env: Env) -> u64 {
        patient::count(&env)
    }

    pub fn get_doctor_count(env: Env) -> u64 {
        doctor::count(&env)
    }

    // ======================== Access Grants ========================

    /// Lets `doctor` read the caller's profile and files. Granting twice is a
    /// successful no-op. The grantee does not have to be a registered doctor.
    pub fn grant_access(env: Env, caller: Address, doctor: Address) -> Result<(), ContractError> {
        Self::require_not_paused(&env, circuit_breaker::GRANT_ACCESS, &caller, "grant_access")?;
        caller.require_auth();

        if !patient::is_registered(&env, &caller) {
            return Err(errors::report(
                &env,
                ContractError::NotFound,
                Some(caller),
                "grant_access",
            ));
        }

        if access::grant(&env, &caller, &doctor) {
            events::publish_access_granted(&env, caller, doctor);
        }

        Ok(())
    }

    /// Withdraws a grant. Revoking a grant that does not exist is a
    /// successful no-op.
    pub fn revoke_access(env: Env, caller: Address, doctor: Address) -> Result<(), ContractError> {
        Self::require_not_paused(&env, circuit_breaker::REVOKE_ACCESS, &caller, "revoke_access")?;
        caller.require_auth();

        if !patient::is_registered(&env, &caller) {
            return Err(errors::report(
                &env,
                ContractError::NotFound,
                Some(caller),
                "revoke_access",
            ));
        }

        if access::revoke(&env, &caller, &doctor) {
            events::publish_access_revoked(&env, caller, doctor);
        }

        Ok(())
    }

    /// Pure membership check; this is the gate other reads rely on.
    pub fn has_access(env: Env, patient: Address, doctor: Address) -> bool {
        access::has_access(&env, &patient, &doctor)
    }

    /// The patient's grant set, in grant order. Visible to the patient only.
    pub fn get_grantees(
        env: Env,
        caller: Address,
        patient: Address,
    ) -> Result<Vec<Address>, ContractError> {
        caller.require_auth();

        if !patient::is_registered(&env, &patient) {
            return Err(errors::report(
                &env,
                ContractError::NotFound,
                Some(patient),
                "get_grantees",
            ));
        }
        if caller != patient {
            return Err(errors::report(
                &env,
                ContractError::AccessDenied,
                Some(caller),
                "get_grantees",
            ));
        }

        Ok(access::grantees(&env, &patient))
    }

    // ======================== Medical Files ========================

    /// Appends a file to the caller's own record and returns the caller's
    /// file count after the append.
    pub fn add_file(
        env: Env,
        caller: Address,
        file_name: String,
        file_type: String,
        content_address: String,
    ) -> Result<u32, ContractError> {
        Self::require_not_paused(&env, circuit_breaker::ADD_FILE, &caller, "add_file")?;
        caller.require_auth();

        if !patient::is_registered(&env, &caller) {
            return Err(errors::report(
                &env,
                ContractError::NotFound,
                Some(caller),
                "add_file",
            ));
        }

        let file = MedicalFile {
            file_name,
            file_type: file_type.clone(),
            content_address,
            uploaded_at: env.ledger().timestamp(),
        };
        let count = files::append(&env, &caller, file);

        events::publish_file_added(&env, caller, count.saturating_sub(1), file_type);

        Ok(count)
    }

    /// Returns the patient's files in upload order. Same gate as
    /// `get_patient_info`.
    pub fn get_patient_files(
        env: Env,
        caller: Address,
        patient: Address,
    ) -> Result<Vec<MedicalFile>, ContractError> {
        caller.require_auth();

        if !patient::is_registered(&env, &patient) {
            return Err(errors::report(
                &env,
                ContractError::NotFound,
                Some(patient),
                "get_patient_files",
            ));
        }

        if !access::can_read(&env, &patient, &caller) {
            return Err(errors::report(
                &env,
                ContractError::AccessDenied,
                Some(caller),
                "get_patient_files",
            ));
        }

        Ok(files::list(&env, &patient))
    }

    // ======================== Circuit Breaker ========================

    /// Engages a circuit breaker. Admin only.
    pub fn pause(env: Env, caller: Address, scope: PauseScope) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_admin(&env, &caller, "pause")?;
        circuit_breaker::pause(&env, caller, scope);
        extend_instance_ttl(&env);
        Ok(())
    }

    /// Releases a circuit breaker. Admin only.
    pub fn resume(env: Env, caller: Address, scope: PauseScope) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_admin(&env, &caller, "resume")?;
        circuit_breaker::resume(&env, caller, scope);
        extend_instance_ttl(&env);
        Ok(())
    }

    pub fn is_paused(env: Env, scope: PauseScope) -> bool {
        circuit_breaker::is_paused(&env, &scope)
    }

    /// Contract version
    pub fn version() -> u32 {
        1
    }
}
