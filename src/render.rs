// render.rs
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{HandshapeError, Result};
use crate::hand::ArmConfiguration;
use crate::pose::PoseDocument;

/// External renderer, invoked as `executable <scene_spec> <pose> <image>`.
#[derive(Debug, Clone)]
pub struct Renderer {
    pub executable: PathBuf,
    pub scene_spec: PathBuf,
}

impl Renderer {
    pub fn new(executable: impl Into<PathBuf>, scene_spec: impl Into<PathBuf>) -> Self {
        Self { executable: executable.into(), scene_spec: scene_spec.into() }
    }

    /// Runs the renderer once and waits for it. Its output is discarded.
    pub fn render(&self, pose: &Path, image: &Path) -> Result<()> {
        tracing::info!(pose = %pose.display(), image = %image.display(), "rendering");
        let status = Command::new(&self.executable)
            .arg(&self.scene_spec)
            .arg(pose)
            .arg(image)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| HandshapeError::io(&self.executable, e))?;
        if !status.success() {
            return Err(HandshapeError::Render(format!(
                "{} exited with {status} while rendering {}",
                self.executable.display(),
                image.display()
            )));
        }
        Ok(())
    }

    /// Moves `base_pose` from `base` to `target`, writes it to `pose_out` and renders it.
    pub fn render_arm(
        &self,
        base_pose: &PoseDocument,
        base: &ArmConfiguration,
        target: &ArmConfiguration,
        pose_out: &Path,
        image: &Path,
    ) -> Result<()> {
        base_pose.apply(base, target)?.write(pose_out)?;
        self.render(pose_out, image)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn exit_status_decides_success() {
        let dir = tempfile::tempdir().unwrap();
        let (pose, image) = (dir.path().join("pose.json"), dir.path().join("out.png"));
        assert!(Renderer::new("true", "scene.yml").render(&pose, &image).is_ok());
        assert!(matches!(
            Renderer::new("false", "scene.yml").render(&pose, &image),
            Err(HandshapeError::Render(_))
        ));
    }

    #[test]
    fn missing_executable_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = Renderer::new(dir.path().join("no-such-renderer"), "scene.yml");
        let err = renderer.render(&dir.path().join("p.json"), &dir.path().join("i.png")).unwrap_err();
        assert!(matches!(err, HandshapeError::Io { .. }));
    }

    #[test]
    fn render_arm_writes_the_pose_first() {
        let dir = tempfile::tempdir().unwrap();
        let base_pose = PoseDocument::from_json(
            r#"{"hand_joints": {"metacarpals": [0, 0, 0], "carpals": [0, 0, 0], "finger4 joint1": [0, 0, 0]}}"#,
        )
        .unwrap();
        let base = crate::pose::base_arm().unwrap();
        let pose_out = dir.path().join("pose.json");
        Renderer::new("true", "scene.yml")
            .render_arm(&base_pose, &base, &base, &pose_out, &dir.path().join("i.png"))
            .unwrap();
        assert_eq!(PoseDocument::from_path(&pose_out).unwrap(), base_pose);
    }
}
