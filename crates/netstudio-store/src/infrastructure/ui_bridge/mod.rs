//! UI command bridge: exposes the network use cases to the desktop frontend.
//!
//! Each command here backs one frontend hook (`useNets`, `useNet`,
//! `useCreateNet`, `useRenameNet`, ...).  Commands take plain
//! JSON-friendly arguments (ids as strings), delegate to the shared
//! [`AppState`], and never return `Err`: failures are folded into a
//! [`CommandResult`] so the frontend can always read `result.success`
//! without a try/catch around the invoke call.
//!
//! The records themselves (`NetworkSummary`, `NetworkConfig`) already
//! serialise in the camelCase shape the frontend uses, so they are returned
//! as-is; only the inputs need DTOs.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use netstudio_core::{
    DatasetFormat, DatasetPurpose, ModelType, NetId, NetUpdate, NetworkConfig, NetworkSummary,
};
use serde::{Deserialize, Serialize};

use crate::application::manage_nets::NetService;
use crate::application::store::StoreError;
use crate::infrastructure::storage::fs_store::FsNetStore;
use crate::infrastructure::storage::settings::AppSettings;

// ── Shared application state ──────────────────────────────────────────────────

/// State shared between all commands.
///
/// Wrapped in `Arc<>` and handed to every command.  The service is
/// internally synchronised (async mutexes around its cache and mutation
/// path), so no outer lock is needed.
pub struct AppState {
    pub service: NetService<FsNetStore>,
    pub settings: AppSettings,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Builds the state for a resolved data directory.
    pub fn new(settings: AppSettings, data_dir: PathBuf) -> Arc<Self> {
        let service = NetService::new(FsNetStore::new(&data_dir))
            .with_artifact_cleanup(settings.storage.purge_artifacts_on_delete);
        Arc::new(Self {
            service,
            settings,
            data_dir,
        })
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// Arguments of `rename_net`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameNetDto {
    pub id: String,
    pub name: String,
}

/// Arguments of `save_net`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNetDto {
    pub net: NetUpdate,
    /// Raw CSV bytes of a training dataset to attach.
    #[serde(default)]
    pub training_file: Option<Vec<u8>>,
}

/// Unified response wrapper used by every command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    /// `true` when the failure was a missing network, so the frontend can
    /// drop a stale selection instead of showing an error toast.
    #[serde(default)]
    pub not_found: bool,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            not_found: false,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
            not_found: false,
        }
    }
}

impl<T: Serialize> From<Result<T, StoreError>> for CommandResult<T> {
    fn from(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(data) => CommandResult::ok(data),
            Err(e) => {
                let mut out = CommandResult::err(e.to_string());
                out.not_found = e.is_not_found();
                out
            }
        }
    }
}

fn parse_id(id: &str) -> Result<NetId, String> {
    NetId::from_str(id).map_err(|e| format!("invalid network id {id:?}: {e}"))
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns all networks in sidebar order.
///
/// ```ts
/// const nets = await invoke<CommandResult<NetworkSummary[]>>('list_nets');
/// ```
pub async fn list_nets(state: Arc<AppState>) -> CommandResult<Vec<NetworkSummary>> {
    state.service.list_nets().await.into()
}

/// Returns the full record of one network.
pub async fn get_net(state: Arc<AppState>, id: String) -> CommandResult<NetworkConfig> {
    match parse_id(&id) {
        Ok(id) => state.service.get_net(id).await.into(),
        Err(e) => CommandResult::err(e),
    }
}

/// Returns the record of the selected network, `null` when none is selected.
pub async fn current_net(state: Arc<AppState>) -> CommandResult<Option<NetworkConfig>> {
    state.service.current_net().await.into()
}

/// Selects a network.  An empty id clears the selection.
pub async fn select_net(state: Arc<AppState>, id: String) -> CommandResult<()> {
    if id.is_empty() {
        state.service.selection().clear();
        return CommandResult::ok(());
    }
    match parse_id(&id) {
        Ok(id) => state.service.select_net(id).await.into(),
        Err(e) => CommandResult::err(e),
    }
}

/// Creates a network of the given model type from its default template.
pub async fn create_net(state: Arc<AppState>, model_type: String) -> CommandResult<NetworkConfig> {
    match ModelType::from_str(&model_type) {
        Ok(model_type) => state.service.create_net(model_type).await.into(),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Renames a network.
pub async fn rename_net(state: Arc<AppState>, args: RenameNetDto) -> CommandResult<NetworkSummary> {
    match parse_id(&args.id) {
        Ok(id) => state.service.rename_net(id, &args.name).await.into(),
        Err(e) => CommandResult::err(e),
    }
}

/// Saves a full settings update, optionally attaching a training dataset.
pub async fn save_net(state: Arc<AppState>, args: SaveNetDto) -> CommandResult<NetworkConfig> {
    state
        .service
        .save_net(args.net, args.training_file.as_deref())
        .await
        .into()
}

/// Deletes a network.
pub async fn delete_net(state: Arc<AppState>, id: String) -> CommandResult<NetworkSummary> {
    match parse_id(&id) {
        Ok(id) => state.service.delete_net(id).await.into(),
        Err(e) => CommandResult::err(e),
    }
}

/// Returns the raw bytes of a stored CSV dataset.
pub async fn read_dataset(
    state: Arc<AppState>,
    id: String,
    purpose: String,
) -> CommandResult<Vec<u8>> {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e),
    };
    match DatasetPurpose::from_str(&purpose) {
        Ok(purpose) => state
            .service
            .read_dataset(purpose, id, DatasetFormat::Csv)
            .await
            .into(),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Creates state rooted in a fresh temp directory so tests never touch
    /// the real platform data directory.
    fn make_state() -> Arc<AppState> {
        let dir = std::env::temp_dir().join(format!("netstudio_bridge_{}", Uuid::new_v4()));
        AppState::new(AppSettings::default(), dir)
    }

    fn cleanup(state: &AppState) {
        std::fs::remove_dir_all(&state.data_dir).ok();
    }

    #[tokio::test]
    async fn test_list_nets_returns_empty_list_initially() {
        // Arrange
        let state = make_state();

        // Act
        let result = list_nets(Arc::clone(&state)).await;

        // Assert
        assert!(result.success);
        assert!(result.data.unwrap().is_empty());
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_create_net_rejects_unknown_model_type() {
        let state = make_state();

        let result = create_net(Arc::clone(&state), "transformer".to_string()).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("transformer"));
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_get_net_fails_with_invalid_uuid() {
        let state = make_state();

        let result = get_net(Arc::clone(&state), "not-a-uuid".to_string()).await;

        assert!(!result.success);
        assert!(!result.not_found);
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_rename_unknown_net_reports_not_found() {
        // Arrange
        let state = make_state();
        let args = RenameNetDto {
            id: Uuid::new_v4().to_string(),
            name: "Foo".to_string(),
        };

        // Act
        let result = rename_net(Arc::clone(&state), args).await;

        // Assert
        assert!(!result.success);
        assert!(result.not_found);
        let listed = list_nets(Arc::clone(&state)).await.data.unwrap();
        assert!(listed.is_empty(), "rename must not create an entry");
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_select_then_current_net_returns_selected_record() {
        // Arrange
        let state = make_state();
        let created = create_net(Arc::clone(&state), "multilayerPerceptron".to_string())
            .await
            .data
            .unwrap();

        // Act
        let selected = select_net(Arc::clone(&state), created.id.to_string()).await;
        let current = current_net(Arc::clone(&state)).await;

        // Assert
        assert!(selected.success);
        assert_eq!(current.data.unwrap(), Some(created));
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_select_empty_id_clears_selection() {
        let state = make_state();
        state.service.selection().select(Uuid::new_v4());

        let result = select_net(Arc::clone(&state), String::new()).await;

        assert!(result.success);
        assert_eq!(state.service.selection().current(), None);
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_save_net_with_training_file_then_read_dataset() {
        // Arrange
        let state = make_state();
        let created = create_net(Arc::clone(&state), "multilayerPerceptron".to_string())
            .await
            .data
            .unwrap();
        let args = SaveNetDto {
            net: NetUpdate::from(&created),
            training_file: Some(b"y,x\n1,2\n".to_vec()),
        };

        // Act
        let saved = save_net(Arc::clone(&state), args).await;
        let dataset = read_dataset(
            Arc::clone(&state),
            created.id.to_string(),
            "training".to_string(),
        )
        .await;

        // Assert
        assert!(saved.success, "save failed: {:?}", saved.error);
        assert!(saved.data.unwrap().training_file_saved);
        assert_eq!(dataset.data.unwrap(), b"y,x\n1,2\n".to_vec());
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_read_dataset_rejects_unknown_purpose() {
        let state = make_state();

        let result = read_dataset(
            Arc::clone(&state),
            Uuid::new_v4().to_string(),
            "validation".to_string(),
        )
        .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("validation"));
        cleanup(&state);
    }

    #[test]
    fn test_save_dto_parses_frontend_payload() {
        // The frontend sends the whole record; name and flags are ignored.
        let payload = serde_json::json!({
            "net": {
                "id": Uuid::nil().to_string(),
                "name": "ignored",
                "initialSetting": true,
                "modelType": "multilayerPerceptron",
                "hiddenLayersCnt": 1,
                "networkType": "regression",
                "inputNormalizationFunc": "noNormalization",
                "inputNeuronCnt": 2,
                "hiddenLayersSettings": [{ "activationFunc": "linear", "neuronCnt": 4 }],
                "outputNeuronCnt": 1,
                "outputActivationFunc": "sigmoid",
                "outputNeuronLabels": ["y"],
                "costFunc": "mse",
                "iterationCnt": 50,
                "outputCol": 0,
                "includedCols": [1, 2]
            }
        });

        let dto: SaveNetDto = serde_json::from_value(payload).expect("payload parses");

        assert_eq!(dto.net.id, Uuid::nil());
        assert!(dto.training_file.is_none());
    }

    #[test]
    fn test_command_result_ok_sets_success_true() {
        let r: CommandResult<i32> = CommandResult::ok(42);
        assert!(r.success);
        assert_eq!(r.data.unwrap(), 42);
        assert!(r.error.is_none());
    }

    #[test]
    fn test_command_result_from_not_found_sets_flag() {
        let id = Uuid::new_v4();
        let r: CommandResult<()> = Err(StoreError::NotFound { id }).into();
        assert!(!r.success);
        assert!(r.not_found);
        assert_eq!(r.error.unwrap(), format!("network {id} not found"));
    }
}
