use crate::engine::SceneRuntime;

use super::color;

/// Output of one console command. The host prints `lines`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConsoleReply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl ConsoleReply {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }

    fn json(value: &impl serde::Serialize) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(json) => Self {
                lines: json.lines().map(str::to_string).collect(),
                quit: false,
            },
            Err(e) => Self::line(format!("failed to serialize JSON: {e}")),
        }
    }
}

/// Runs console commands against the scene runtime.
///
/// Called on the host thread, between frames. Scene-changing commands are
/// queued on the runtime and take effect on the next frame.
#[derive(Debug, Default)]
pub struct ConsoleBackend;

impl ConsoleBackend {
    pub fn new() -> Self {
        Self
    }

    /// Execute a single command. `cmd | grep <pattern>` filters the output lines.
    pub fn exec(&mut self, runtime: &mut SceneRuntime, cmd: &str) -> ConsoleReply {
        let cmd = cmd.trim();
        if cmd.is_empty() {
            return ConsoleReply::default();
        }

        if let Some((head, tail)) = cmd.split_once('|') {
            let mut stage = tail.split_whitespace();
            return match (stage.next(), stage.next(), stage.next()) {
                (Some("grep"), Some(pattern), None) => {
                    let mut reply = self.exec_one(runtime, head.trim());
                    let needle = pattern.to_ascii_lowercase();
                    reply
                        .lines
                        .retain(|l| color::strip(l).to_ascii_lowercase().contains(&needle));
                    reply
                }
                _ => ConsoleReply::line("pipe: only '| grep <pattern>' is supported"),
            };
        }

        self.exec_one(runtime, cmd)
    }

    fn exec_one(&mut self, runtime: &mut SceneRuntime, cmd: &str) -> ConsoleReply {
        let mut it = cmd.split_whitespace();
        let Some(verb) = it.next() else {
            return ConsoleReply::default();
        };
        let args: Vec<&str> = it.collect();

        match (verb, args.as_slice()) {
            ("help", []) => ConsoleReply {
                lines: [
                    "Commands:",
                    "  goto <path>      navigate (e.g. goto /about)",
                    "  scroll <px>      wheel by px (negative scrolls up)",
                    "  cancel           drop a pending navigation",
                    "  pose             target pose and live camera",
                    "  status           route, scene, scroll, quality",
                    "  scenes           camera table and routes",
                    "  <cmd> | grep <pattern>",
                    "  quit",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                quit: false,
            },

            ("goto", [path]) => {
                runtime.navigate(*path);
                ConsoleReply::line(format!("navigating to {path}"))
            }
            ("goto", _) => ConsoleReply::line("usage: goto <path>"),

            ("scroll", [px]) => match px.parse::<f32>() {
                Ok(delta) if delta.is_finite() => {
                    runtime.commands_mut().queue_scroll(delta);
                    ConsoleReply::line(format!("scroll {delta:+.0}px"))
                }
                _ => ConsoleReply::line(format!("scroll: not a number: {px}")),
            },
            ("scroll", _) => ConsoleReply::line("usage: scroll <px>"),

            ("cancel", []) => {
                runtime.commands_mut().queue_cancel();
                match runtime.navigation().pending_path() {
                    Some(path) => ConsoleReply::line(format!("cancelling navigation to {path}")),
                    None => ConsoleReply::line("nothing pending"),
                }
            }

            ("pose", []) => {
                let status = runtime.status();
                ConsoleReply::json(&serde_json::json!({
                    "scene": status.scene,
                    "pose": status.pose,
                    "camera": status.camera,
                    "distance": status.distance_to_pose,
                }))
            }

            ("status", []) => {
                let s = runtime.status();
                let mut lines = vec![
                    format!("path     {}", s.path),
                    format!(
                        "scene    {} {}",
                        color::scene(s.scene),
                        color::dim(format!(
                            "(from {})",
                            s.previous.map(|p| p.name()).unwrap_or("-")
                        ))
                    ),
                    format!(
                        "scroll   {:.0}px{}",
                        s.scroll_offset,
                        if s.scroll_locked { " (locked)" } else { "" }
                    ),
                    format!("quality  {:?} @ {:.2}x", s.quality, s.pixel_ratio),
                    format!("frames   {}", s.frames),
                ];
                if let Some(pending) = &s.pending {
                    lines.insert(1, format!("pending  {pending}"));
                }
                ConsoleReply { lines, quit: false }
            }

            ("scenes", []) => {
                let store = runtime.store();
                let lines = store
                    .table()
                    .entries()
                    .into_iter()
                    .map(|(key, pose)| {
                        let marker = if key == store.current() { "*" } else { " " };
                        format!(
                            "{marker} {:<8} pos ({:.1}, {:.1}, {:.1}) fov {:.0}",
                            color::scene(key),
                            pose.position.x,
                            pose.position.y,
                            pose.position.z,
                            pose.fov
                        )
                    })
                    .collect();
                ConsoleReply { lines, quit: false }
            }

            ("quit" | "exit", []) => ConsoleReply {
                lines: vec!["bye".to_string()],
                quit: true,
            },

            _ => ConsoleReply::line(format!("unknown command: {cmd} (try 'help')")),
        }
    }

    /// Execute all queued commands; returns true if one asked to quit.
    pub fn exec_all<I>(&mut self, runtime: &mut SceneRuntime, commands: I) -> bool
    where
        I: IntoIterator<Item = String>,
    {
        let mut quit = false;
        for cmd in commands {
            let reply = self.exec(runtime, &cmd);
            for line in &reply.lines {
                println!("{line}");
            }
            quit |= reply.quit;
        }
        quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SceneSettings;
    use crate::engine::quality::QualitySettings;
    use crate::engine::scene::SceneKey;

    fn runtime() -> SceneRuntime {
        SceneRuntime::with_defaults(&SceneSettings::default(), QualitySettings::default())
    }

    fn plain(reply: &ConsoleReply) -> Vec<String> {
        reply.lines.iter().map(|l| color::strip(l)).collect()
    }

    #[test]
    fn goto_takes_effect_next_frame() {
        let mut rt = runtime();
        let mut console = ConsoleBackend::new();

        console.exec(&mut rt, "goto /services");
        assert_eq!(rt.store().current(), SceneKey::Home);

        rt.frame(1.0 / 60.0);
        assert_eq!(rt.store().current(), SceneKey::Stairs);

        let status = plain(&console.exec(&mut rt, "status"));
        assert!(status.iter().any(|l| l == "path     /services"));
        assert!(status.iter().any(|l| l.starts_with("scene    stairs")));
    }

    #[test]
    fn scroll_then_goto_reports_pending() {
        let mut rt = runtime();
        let mut console = ConsoleBackend::new();

        console.exec(&mut rt, "scroll 2500");
        console.exec(&mut rt, "goto /lab");
        rt.frame(1.0 / 60.0);

        let status = plain(&console.exec(&mut rt, "status"));
        assert!(status.iter().any(|l| l == "pending  /lab"));
        assert!(status.iter().any(|l| l.ends_with("(locked)")));

        let reply = console.exec(&mut rt, "cancel");
        assert_eq!(reply.lines, vec!["cancelling navigation to /lab".to_string()]);
        rt.frame(1.0 / 60.0);
        assert_eq!(rt.navigation().pending_path(), None);
    }

    #[test]
    fn grep_filters_lines() {
        let mut rt = runtime();
        let mut console = ConsoleBackend::new();

        let reply = console.exec(&mut rt, "scenes | grep hoop");
        assert_eq!(reply.lines.len(), 1);
        assert!(color::strip(&reply.lines[0]).contains("hoop"));

        let reply = console.exec(&mut rt, "scenes | sort");
        assert!(reply.lines[0].starts_with("pipe:"));
    }

    #[test]
    fn bad_input_is_reported_not_fatal() {
        let mut rt = runtime();
        let mut console = ConsoleBackend::new();

        assert_eq!(console.exec(&mut rt, "scroll lots").lines, vec!["scroll: not a number: lots".to_string()]);
        assert!(console.exec(&mut rt, "fly").lines[0].starts_with("unknown command"));
        assert!(console.exec(&mut rt, "   ").lines.is_empty());
        assert!(console.exec(&mut rt, "quit").quit);
    }

    #[test]
    fn pose_is_json() {
        let mut rt = runtime();
        let reply = ConsoleBackend::new().exec(&mut rt, "pose");
        let json: serde_json::Value = serde_json::from_str(&reply.lines.join("\n")).unwrap();
        assert_eq!(json["scene"], "home");
        assert!(json["pose"]["fov"].is_number());
    }
}
