//! Renders resampled camera keyframes into a tick-gated command script.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::resample::resample;
use crate::transform::CameraPose;
use crate::*;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Pieces of the camera command that depend on how the target world is set up.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CommandTemplate {
    /// Entity the camera is placed relative to.
    pub anchor: String,
    pub anchor_offset: String,
    /// Local coordinates of the point the camera orbits.
    pub focus_offset: String,
    pub ease_duration: f64,
    pub ease_function: String,
}

impl Default for CommandTemplate {
    fn default() -> Self {
        Self {
            anchor: "@e[type=pj:song_manager,c=1]".into(),
            anchor_offset: "~~-0.8~".into(),
            focus_offset: "^^^9".into(),
            ease_duration: 0.1,
            ease_function: "linear".into(),
        }
    }
}

impl CommandTemplate {
    /// Camera placement run while the `counter` score equals `tick + 1`.
    pub fn camera(&self, counter: &str, tick: u32, pose: &CameraPose, ease: bool) -> String {
        let ease = if ease {
            format!(" ease {} {}", self.ease_duration, self.ease_function)
        } else {
            String::new()
        };
        format!(
            "execute as @a if score @s {counter} matches {gate} \
             positioned as {anchor} rotated as {anchor} \
             positioned {anchor_offset} positioned {focus_offset} \
             positioned ~{x:.6}~{y:.6}~{z:.6} rotated ~{pitch:.6} ~{yaw:.6} \
             run camera @s set minecraft:free{ease} pos ^^^ rot {pitch:.6} {yaw:.6}",
            counter = counter,
            gate = tick + 1,
            anchor = self.anchor,
            anchor_offset = self.anchor_offset,
            focus_offset = self.focus_offset,
            x = pose.position.x,
            y = pose.position.y,
            z = pose.position.z,
            pitch = pose.pitch.0,
            yaw = pose.yaw.0,
            ease = ease,
        )
    }

    /// Bumps the `counter` score from `value` to `value + 1`.
    pub fn advance(&self, counter: &str, value: u32) -> String {
        format!(
            "execute as @a if score @s {counter} matches {value} \
             run scoreboard players set @s {counter} {next}",
            counter = counter,
            value = value,
            next = value + 1,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub commands: Vec<String>,
    /// Highest tick holding a camera command.
    pub last_tick: u32,
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.commands.join("\n"))
    }
}

impl Script {
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

/// Compiles camera keyframes into one command per tick, gated on the
/// `counter` score.
///
/// The script ends with commands that keep `counter` counting up past the
/// last camera command, so it keeps advancing after the motion is over.
pub fn compile(keyframes: &[CameraKeyframe], counter: &str, config: &Config) -> Result<Script> {
    let ticks = resample(&config.timebase, keyframes);
    let last_tick = match ticks.keys().next_back() {
        Some(&tick) => tick,
        None => return Err(Error::EmptyCamera),
    };

    let mut commands = Vec::with_capacity(ticks.len() + last_tick as usize + 1);
    for (&tick, sample) in &ticks {
        let pose = config.transform.apply(&keyframes[sample.index]);
        if sample.suppress_easing {
            debug!("tick {}: easing suppressed", tick);
        }
        let command = config
            .template
            .camera(counter, tick, &pose, !sample.suppress_easing);
        commands.push(command);
    }
    for value in (1..=last_tick + 1).rev() {
        commands.push(config.template.advance(counter, value));
    }

    info!(
        "{}: {} keyframe(s) -> {} camera command(s), last tick {}",
        counter,
        keyframes.len(),
        ticks.len(),
        last_tick
    );
    Ok(Script {
        commands,
        last_tick,
    })
}

pub fn compile_bytes(data: &[u8], counter: &str, config: &Config) -> Result<Script> {
    let keyframes = read_camera(data)?;
    compile(&keyframes, counter, config)
}

/// `{pack_root}/functions/songs/{counter}/camera.mcfunction`
pub fn output_path(pack_root: &Path, counter: &str) -> PathBuf {
    pack_root
        .join("functions")
        .join("songs")
        .join(counter)
        .join("camera.mcfunction")
}

/// Compiles the motion file at `input` and writes the script next to the
/// other functions of `counter`. Nothing is written if compiling fails.
pub fn convert(input: &Path, counter: &str, config: &Config) -> Result<PathBuf> {
    let data = fs::read(input)?;
    let script = compile_bytes(&data, counter, config)?;
    let path = output_path(&config.pack_root, counter);
    script.write_to(&path)?;
    info!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;

    use cgmath::Vector3;

    fn key(frame: u32, location: [f32; 3]) -> CameraKeyframe {
        CameraKeyframe {
            frame,
            location: location.into(),
            ..Default::default()
        }
    }

    fn camera_file(keys: &[CameraKeyframe]) -> Vec<u8> {
        write_camera_motion(keys, b"camera", Vec::new()).unwrap()
    }

    #[test]
    fn command_text() {
        let script = compile(&[key(0, [6., 12., 18.])], "villain", &Config::default()).unwrap();
        assert_eq!(
            script.commands[0],
            "execute as @a if score @s villain matches 1 \
             positioned as @e[type=pj:song_manager,c=1] rotated as @e[type=pj:song_manager,c=1] \
             positioned ~~-0.8~ positioned ^^^9 \
             positioned ~-1.000000~2.000000~3.000000 rotated ~0.000000 ~-0.000000 \
             run camera @s set minecraft:free ease 0.1 linear pos ^^^ rot 0.000000 -0.000000"
        );
        assert_eq!(
            script.commands[1],
            "execute as @a if score @s villain matches 1 run scoreboard players set @s villain 2"
        );
        assert_eq!(script.commands.len(), 2);
        assert_eq!(script.last_tick, 0);
    }

    #[test]
    fn duplicate_tick_keeps_first() {
        let keys = [key(3, [6., 0., 0.]), key(4, [60., 0., 0.])];
        let script = compile(&keys, "s", &Config::default()).unwrap();
        assert_eq!(script.last_tick, 2);
        let camera: Vec<&String> = script
            .commands
            .iter()
            .filter(|c| c.contains("camera @s"))
            .collect();
        assert_eq!(camera.len(), 1);
        assert!(camera[0].contains("matches 3 "));
        assert!(camera[0].contains("~-1.000000~"));
    }

    #[test]
    fn suppressed_easing() {
        let keys: Vec<_> = [0, 3, 4, 9, 15].iter().map(|&f| key(f, [0.; 3])).collect();
        let script = compile(&keys, "s", &Config::default()).unwrap();
        let camera = &script.commands[..4];
        let plain: Vec<usize> = camera
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.contains(" ease "))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(plain, [2]);
        assert!(camera[2].contains("matches 7 "));
        assert!(camera[2].contains("set minecraft:free pos ^^^ rot "));
    }

    #[test]
    fn counter_block() {
        let script = compile(&[key(60, [0.; 3])], "s", &Config::default()).unwrap();
        assert_eq!(script.last_tick, 40);
        let block = &script.commands[1..];
        assert_eq!(block.len(), 41);
        for (i, command) in block.iter().enumerate() {
            let j = 41 - i;
            assert_eq!(
                command,
                &format!(
                    "execute as @a if score @s s matches {} run scoreboard players set @s s {}",
                    j,
                    j + 1
                )
            );
        }
    }

    #[test]
    fn emitted_by_tick() {
        let keys = [key(30, [0.; 3]), key(0, [0.; 3])];
        let script = compile(&keys, "s", &Config::default()).unwrap();
        assert!(script.commands[0].contains("matches 1 "));
        assert!(script.commands[1].contains("matches 21 "));
        assert_eq!(script.commands.len(), 2 + 21);
    }

    #[test]
    fn template_is_configurable() {
        let mut config = Config::default();
        config.template.anchor = "@p".into();
        config.template.ease_duration = 0.25;
        config.template.ease_function = "in_out_sine".into();
        let script = compile(&[key(0, [0.; 3])], "s", &config).unwrap();
        assert!(script.commands[0].contains("positioned as @p rotated as @p "));
        assert!(script.commands[0].contains(" ease 0.25 in_out_sine pos "));
    }

    #[test]
    fn empty_camera() {
        assert!(matches!(
            compile(&[], "s", &Config::default()),
            Err(Error::EmptyCamera)
        ));
        assert!(matches!(
            compile_bytes(&camera_file(&[]), "s", &Config::default()),
            Err(Error::EmptyCamera)
        ));
    }

    #[test]
    fn deterministic() {
        let keys: Vec<_> = (0..50u32)
            .map(|i| CameraKeyframe {
                frame: i * 7 % 90,
                location: Vector3::new(i as f32, -(i as f32) * 0.5, 3.),
                rotation: Vector3::new(0.01 * i as f32, -0.02 * i as f32, 0.),
                ..Default::default()
            })
            .collect();
        let data = camera_file(&keys);
        let a = compile_bytes(&data, "villain", &Config::default()).unwrap();
        let b = compile_bytes(&data, "villain", &Config::default()).unwrap();
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("camera.vmd");
        fs::write(&input, camera_file(&[key(0, [0.; 3]), key(15, [6., 6., 6.])])).unwrap();
        let config = Config {
            pack_root: dir.path().join("BP"),
            ..Default::default()
        };
        fs::create_dir_all(config.pack_root.join("functions/songs/villain")).unwrap();

        let path = convert(&input, "villain", &config).unwrap();
        assert_eq!(path, output_path(&config.pack_root, "villain"));
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2 + 11);
        assert!(!text.ends_with('\n'));
        assert!(text.ends_with("matches 1 run scoreboard players set @s villain 2"));
    }

    #[test]
    fn invalid_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("camera.vmd");
        let mut data = camera_file(&[key(0, [0.; 3])]);
        data[..8].copy_from_slice(b"Polygon ");
        fs::write(&input, data).unwrap();
        let config = Config {
            pack_root: dir.path().to_path_buf(),
            ..Default::default()
        };
        fs::create_dir_all(config.pack_root.join("functions/songs/villain")).unwrap();

        assert!(matches!(
            convert(&input, "villain", &config),
            Err(Error::InvalidFormat)
        ));
        assert!(!output_path(&config.pack_root, "villain").exists());
    }
}
