//! Pipeline identity read from `HARNESS_*` environment variables.

/// Execution id of the pipeline run.
pub const ENV_EXECUTION_ID: &str = "HARNESS_EXECUTION_ID";
/// Id of the step invoking the tool.
pub const ENV_STEP_ID: &str = "HARNESS_STEP_ID";
pub const ENV_ACCOUNT_ID: &str = "HARNESS_ACCOUNT_ID";
pub const ENV_PROJECT_ID: &str = "HARNESS_PROJECT_ID";
pub const ENV_ORG_ID: &str = "HARNESS_ORG_ID";
pub const ENV_PIPELINE_ID: &str = "HARNESS_PIPELINE_ID";
pub const ENV_STAGE_ID: &str = "HARNESS_STAGE_ID";
pub const ENV_STAGE_UUID: &str = "HARNESS_STAGE_UUID";

/// Snapshot of the pipeline identity variables.
///
/// Values are kept as given; empty values are treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HarnessContext {
    pub execution_id: Option<String>,
    pub step_id: Option<String>,
    pub account_id: Option<String>,
    pub project_id: Option<String>,
    pub org_id: Option<String>,
    pub pipeline_id: Option<String>,
    pub stage_id: Option<String>,
    pub stage_uuid: Option<String>,
}

impl HarnessContext {
    /// Read the context from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the context through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            execution_id: get(ENV_EXECUTION_ID),
            step_id: get(ENV_STEP_ID),
            account_id: get(ENV_ACCOUNT_ID),
            project_id: get(ENV_PROJECT_ID),
            org_id: get(ENV_ORG_ID),
            pipeline_id: get(ENV_PIPELINE_ID),
            stage_id: get(ENV_STAGE_ID),
            stage_uuid: get(ENV_STAGE_UUID),
        }
    }

    /// The step id, or `""` when unset.
    pub fn step_id_or_empty(&self) -> &str {
        self.step_id.as_deref().unwrap_or("")
    }
}
