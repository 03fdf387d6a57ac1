use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::CommandError;
use crate::CommandOutput;
use crate::CommandRunner;
use crate::CommandSpec;

/// Canned result for a scripted command.
#[derive(Debug, Clone)]
pub enum Reply {
    Output(CommandOutput),
    Timeout,
    SpawnFailure,
}

impl Reply {
    pub fn ok(stdout: &str) -> Self {
        Reply::Output(CommandOutput {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub fn exit(code: i32) -> Self {
        Reply::Output(CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: format!("exit {}", code),
        })
    }
}

struct Rule {
    pattern: String,
    reply: Reply,
    once: bool,
    used: bool,
}

/// `CommandRunner` that answers from a script instead of spawning processes.
///
/// A command matches a rule when its rendered command line contains the
/// rule's pattern. One-shot rules are consulted before persistent ones and
/// are consumed on first match. Unmatched commands succeed with empty output.
/// Every command is recorded.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        self,
        pattern: &str,
        reply: Reply,
    ) -> Self {
        self.push(pattern, reply, false);
        self
    }

    pub fn once(
        self,
        pattern: &str,
        reply: Reply,
    ) -> Self {
        self.push(pattern, reply, true);
        self
    }

    fn push(
        &self,
        pattern: &str,
        reply: Reply,
        once: bool,
    ) {
        self.rules.lock().unwrap().push(Rule {
            pattern: pattern.to_string(),
            reply,
            once,
            used: false,
        });
    }

    /// Rendered command lines in execution order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|c| c.to_string()).collect()
    }

    pub fn specs(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_matching(
        &self,
        pattern: &str,
    ) -> usize {
        self.calls().iter().filter(|c| c.contains(pattern)).count()
    }

    fn reply_for(
        &self,
        line: &str,
    ) -> Reply {
        let mut rules = self.rules.lock().unwrap();
        if let Some(rule) = rules
            .iter_mut()
            .find(|r| r.once && !r.used && line.contains(&r.pattern))
        {
            rule.used = true;
            return rule.reply.clone();
        }
        rules
            .iter()
            .find(|r| !r.once && line.contains(&r.pattern))
            .map(|r| r.reply.clone())
            .unwrap_or_else(|| Reply::ok(""))
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        spec: &CommandSpec,
    ) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(spec.clone());
        let line = spec.to_string();
        match self.reply_for(&line) {
            Reply::Output(output) => Ok(output),
            Reply::Timeout => Err(CommandError::Timeout {
                command: line,
                timeout: spec.timeout.unwrap_or(Duration::ZERO),
            }),
            Reply::SpawnFailure => Err(CommandError::Spawn {
                program: spec.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted"),
            }),
        }
    }
}
