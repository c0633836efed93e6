//! Background URDF loading and status tracking.
//!
//! Loading happens on a worker thread so the render loop never blocks on
//! disk. The worker resolves the source chain, parses the URDF, and loads
//! every referenced mesh, then hands the finished [`LoadedRobot`] back
//! through a one-shot channel. [`drive_loader`] polls that channel each
//! frame alongside the [`ReadyGate`] deadlines and folds both into
//! [`ViewerStatus`] plus load events.
//!
//! Per-mesh failures are demoted to warnings: a robot with one bad mesh
//! still spawns, minus that visual.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use jointdeck_core::ViewerConfig;
use jointdeck_mesh::MeshLoaderRegistry;
use jointdeck_urdf::{PackageMap, RobotModel, parse_string, resolve_sources, source_dir};

use crate::error::ViewerError;
use crate::gate::{GateEvent, ReadyGate};

// ---------------------------------------------------------------------------
// Request and result types
// ---------------------------------------------------------------------------

/// Everything the loader needs, detached from the ECS so it can cross into
/// the worker thread.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// URDF source candidates, tried in order.
    pub sources: Vec<PathBuf>,
    /// Named `package://` roots.
    pub packages: HashMap<String, PathBuf>,
    /// Catch-all root for packages not named in `packages`.
    pub package_root: Option<PathBuf>,
}

impl LoadRequest {
    #[must_use]
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            sources: config.sources.clone(),
            packages: config.packages.clone(),
            package_root: config.package_root.clone(),
        }
    }
}

/// A fully loaded robot: parsed model plus every mesh that loaded.
#[derive(Debug)]
pub struct LoadedRobot {
    /// The source that won the fallback chain.
    pub source: PathBuf,
    pub model: RobotModel,
    /// Loaded meshes keyed by the reference string in the URDF.
    pub meshes: HashMap<String, Mesh>,
    /// Per-mesh failures, formatted for display.
    pub warnings: Vec<String>,
}

/// Resolve, parse, and load meshes for one request.
pub fn load_robot(
    request: &LoadRequest,
    registry: &MeshLoaderRegistry,
) -> Result<LoadedRobot, ViewerError> {
    let (source, content) = resolve_sources(&request.sources)?;
    let model = parse_string(&content)?;

    let packages = PackageMap::new(request.packages.clone(), request.package_root.clone());
    let urdf_dir = source_dir(&source);

    let mut meshes = HashMap::new();
    let mut warnings = Vec::new();
    for filename in model.mesh_filenames() {
        let resolved = match packages.resolve(filename, &urdf_dir) {
            Ok(path) => path,
            Err(e) => {
                warnings.push(format!("{filename}: {e}"));
                continue;
            }
        };
        match registry.load(&resolved) {
            Ok(mesh) => {
                meshes.insert(filename.to_string(), mesh);
            }
            Err(e) => warnings.push(format!("{filename}: {e}")),
        }
    }

    Ok(LoadedRobot {
        source,
        model,
        meshes,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Shared mesh loader registry, cloned into the worker thread.
#[derive(Resource, Clone)]
pub struct MeshLoaders(pub Arc<MeshLoaderRegistry>);

impl Default for MeshLoaders {
    fn default() -> Self {
        Self(Arc::new(MeshLoaderRegistry::with_default_loaders()))
    }
}

/// Marker resource: the viewer scaffold has registered with the app.
#[derive(Resource, Debug, Default)]
pub struct ViewerRegistered;

/// A loaded robot waiting for the spawner to pick it up.
#[derive(Resource, Debug)]
pub struct PendingRobot(pub LoadedRobot);

/// Handle to an in-flight load on a worker thread.
///
/// The worker sends exactly one result. Dropping this resource detaches the
/// worker: its send fails harmlessly and the result is discarded.
#[derive(Resource)]
pub struct RobotLoadTask {
    receiver: Mutex<Receiver<Result<LoadedRobot, ViewerError>>>,
}

impl RobotLoadTask {
    /// Start loading `request` on a worker thread.
    #[must_use]
    pub fn spawn(request: LoadRequest, registry: Arc<MeshLoaderRegistry>) -> Self {
        let (sender, receiver) = mpsc::channel();
        std::thread::spawn(move || {
            let _ = sender.send(load_robot(&request, &registry));
        });
        Self {
            receiver: Mutex::new(receiver),
        }
    }

    /// Take the result if the worker has finished. Non-blocking.
    pub fn try_take(&self) -> Option<Result<LoadedRobot, ViewerError>> {
        self.receiver.lock().ok().and_then(|rx| rx.try_recv().ok())
    }
}

// ---------------------------------------------------------------------------
// Status and events
// ---------------------------------------------------------------------------

/// What the viewer is currently doing, rendered on the status line.
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub enum ViewerStatus {
    /// Waiting for the viewer scaffold.
    #[default]
    Initializing,
    /// Scaffold registered, robot loading.
    Loading,
    /// Robot spawned and interactive.
    Ready {
        name: String,
        warnings: Vec<String>,
    },
    /// Load failed; `message` explains why.
    Failed { message: String },
}

impl ViewerStatus {
    /// Human-readable status line.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Initializing => "Initializing viewer...".to_string(),
            Self::Loading => "Loading URDF model...".to_string(),
            Self::Ready { name, .. } => format!("Loaded: {name}"),
            Self::Failed { message } => format!("Error: {message}"),
        }
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Fired once when a robot finishes loading.
#[derive(Event, Debug, Clone)]
pub struct RobotLoaded {
    pub name: String,
    pub source: PathBuf,
}

/// Fired once when the load pipeline gives up.
#[derive(Event, Debug, Clone)]
pub struct RobotLoadFailed {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Startup system marking the viewer scaffold as registered.
pub fn register_viewer(mut commands: Commands) {
    commands.insert_resource(ViewerRegistered);
}

/// Startup system kicking off the background load.
#[allow(clippy::needless_pass_by_value)]
pub fn begin_load(mut commands: Commands, config: Res<ViewerConfig>, loaders: Res<MeshLoaders>) {
    let request = LoadRequest::from_config(&config);
    commands.insert_resource(RobotLoadTask::spawn(request, Arc::clone(&loaders.0)));
}

/// Per-frame pipeline driver: polls the worker channel and the gate
/// deadlines, updating [`ViewerStatus`] and firing load events.
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
pub fn drive_loader(
    mut commands: Commands,
    time: Res<Time>,
    mut gate: ResMut<ReadyGate>,
    mut status: ResMut<ViewerStatus>,
    task: Option<Res<RobotLoadTask>>,
    registered: Option<Res<ViewerRegistered>>,
    mut loaded_events: EventWriter<RobotLoaded>,
    mut failed_events: EventWriter<RobotLoadFailed>,
) {
    // A finished load settles the gate before any deadline is looked at, so
    // a robot already in hand never loses to its own timeout.
    if let Some(task) = task.as_deref() {
        if let Some(result) = task.try_take() {
            commands.remove_resource::<RobotLoadTask>();
            match result {
                Ok(loaded) => {
                    gate.resolve();
                    let name = loaded.model.display_name().to_string();
                    *status = ViewerStatus::Ready {
                        name: name.clone(),
                        warnings: loaded.warnings.clone(),
                    };
                    loaded_events.write(RobotLoaded {
                        name,
                        source: loaded.source.clone(),
                    });
                    commands.insert_resource(PendingRobot(loaded));
                }
                Err(e) => {
                    gate.fail();
                    let message = e.to_string();
                    *status = ViewerStatus::Failed {
                        message: message.clone(),
                    };
                    failed_events.write(RobotLoadFailed { message });
                }
            }
            return;
        }
    }

    match gate.poll(time.elapsed(), registered.is_some()) {
        Some(GateEvent::Registered) => {
            if *status == ViewerStatus::Initializing {
                *status = ViewerStatus::Loading;
            }
        }
        Some(GateEvent::RegistrationTimedOut) => {
            let error = ViewerError::RegistrationTimeout(gate.registration_timeout());
            deadline_failure(&mut commands, &mut status, &mut failed_events, &error);
        }
        Some(GateEvent::LoadTimedOut) => {
            let error = ViewerError::LoadTimeout(gate.load_timeout());
            deadline_failure(&mut commands, &mut status, &mut failed_events, &error);
        }
        None => {}
    }
}

fn deadline_failure(
    commands: &mut Commands,
    status: &mut ViewerStatus,
    failed_events: &mut EventWriter<RobotLoadFailed>,
    error: &ViewerError,
) {
    // Detach the worker; a late result has nowhere to land.
    commands.remove_resource::<RobotLoadTask>();
    let message = error.to_string();
    *status = ViewerStatus::Failed {
        message: message.clone(),
    };
    failed_events.write(RobotLoadFailed { message });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const PRIMITIVE_URDF: &str = r#"
        <robot name="primbot">
            <link name="base">
                <visual>
                    <geometry>
                        <box size="0.2 0.2 0.1"/>
                    </geometry>
                </visual>
            </link>
            <link name="arm"/>
            <joint name="swivel" type="revolute">
                <parent link="base"/>
                <child link="arm"/>
                <axis xyz="0 0 1"/>
                <limit lower="-1.0" upper="1.0" effort="10" velocity="1"/>
            </joint>
        </robot>
    "#;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jointdeck_loader_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn request_for(sources: Vec<PathBuf>) -> LoadRequest {
        LoadRequest {
            sources,
            packages: HashMap::new(),
            package_root: None,
        }
    }

    // -- load_robot --

    #[test]
    fn load_robot_with_primitives() {
        let dir = temp_dir("primitives");
        let path = dir.join("robot.urdf");
        std::fs::write(&path, PRIMITIVE_URDF).unwrap();

        let registry = MeshLoaderRegistry::with_default_loaders();
        let loaded = load_robot(&request_for(vec![path.clone()]), &registry).unwrap();

        assert_eq!(loaded.source, path);
        assert_eq!(loaded.model.name, "primbot");
        assert!(loaded.meshes.is_empty());
        assert!(loaded.warnings.is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_mesh_becomes_warning() {
        let dir = temp_dir("missing_mesh");
        let path = dir.join("robot.urdf");
        std::fs::write(
            &path,
            r#"<robot name="m">
                <link name="base">
                    <visual><geometry><mesh filename="meshes/gone.stl"/></geometry></visual>
                </link>
            </robot>"#,
        )
        .unwrap();

        let registry = MeshLoaderRegistry::with_default_loaders();
        let loaded = load_robot(&request_for(vec![path.clone()]), &registry).unwrap();

        assert!(loaded.meshes.is_empty());
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("meshes/gone.stl"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unsupported_mesh_format_becomes_warning() {
        let dir = temp_dir("unsupported");
        let path = dir.join("robot.urdf");
        std::fs::write(
            &path,
            r#"<robot name="m">
                <link name="base">
                    <visual><geometry><mesh filename="meshes/base.dae"/></geometry></visual>
                </link>
            </robot>"#,
        )
        .unwrap();

        let registry = MeshLoaderRegistry::with_default_loaders();
        let loaded = load_robot(&request_for(vec![path.clone()]), &registry).unwrap();

        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("unsupported mesh format"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn exhausted_source_chain_fails() {
        let registry = MeshLoaderRegistry::with_default_loaders();
        let result = load_robot(
            &request_for(vec![PathBuf::from("/nonexistent/a.urdf")]),
            &registry,
        );
        let message = result.unwrap_err().to_string();
        assert!(message.contains("all 1 URDF sources failed"));
    }

    // -- RobotLoadTask --

    #[test]
    fn task_delivers_result_once() {
        let dir = temp_dir("task");
        let path = dir.join("robot.urdf");
        std::fs::write(&path, PRIMITIVE_URDF).unwrap();

        let task = RobotLoadTask::spawn(
            request_for(vec![path.clone()]),
            Arc::new(MeshLoaderRegistry::with_default_loaders()),
        );

        let mut result = None;
        for _ in 0..200 {
            if let Some(r) = task.try_take() {
                result = Some(r);
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }

        let loaded = result.expect("worker did not finish").unwrap();
        assert_eq!(loaded.model.name, "primbot");
        // One-shot: a second take yields nothing.
        assert!(task.try_take().is_none());

        std::fs::remove_file(&path).ok();
    }

    // -- ViewerStatus --

    #[test]
    fn status_text_per_state() {
        assert_eq!(ViewerStatus::Initializing.text(), "Initializing viewer...");
        assert_eq!(ViewerStatus::Loading.text(), "Loading URDF model...");
        assert_eq!(
            ViewerStatus::Ready {
                name: "primbot".into(),
                warnings: Vec::new()
            }
            .text(),
            "Loaded: primbot"
        );
        assert_eq!(
            ViewerStatus::Failed {
                message: "all 1 URDF sources failed: x".into()
            }
            .text(),
            "Error: all 1 URDF sources failed: x"
        );
    }

    #[test]
    fn status_predicates() {
        assert!(
            ViewerStatus::Ready {
                name: String::new(),
                warnings: Vec::new()
            }
            .is_ready()
        );
        assert!(
            ViewerStatus::Failed {
                message: String::new()
            }
            .is_failed()
        );
        assert!(!ViewerStatus::Loading.is_ready());
        assert!(!ViewerStatus::Loading.is_failed());
    }

    // -- LoadRequest --

    #[test]
    fn request_from_config() {
        let mut config = ViewerConfig::default();
        config.sources.push(PathBuf::from("a.urdf"));
        config
            .packages
            .insert("arm".into(), PathBuf::from("/opt/arm"));
        config.package_root = Some(PathBuf::from("/ros"));

        let request = LoadRequest::from_config(&config);
        assert_eq!(request.sources, vec![PathBuf::from("a.urdf")]);
        assert_eq!(request.packages["arm"], PathBuf::from("/opt/arm"));
        assert_eq!(request.package_root, Some(PathBuf::from("/ros")));
    }
}
