use std::fmt;

/// A program, its arguments, and what to feed it
///
/// Environment values are passed to the child but never displayed: secrets travel here instead
/// of on the command line, so logging an invocation is always safe.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: &str) -> Invocation {
        Invocation { program: program.to_string(), args: Vec::new(), stdin: None, env: Vec::new() }
    }

    /// Run `script` with `sh -c`, for commands that need pipes or variable expansion
    pub fn shell(script: &str) -> Invocation {
        Invocation::new("sh").arg("-c").arg(script)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Invocation {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, input: &str) -> Invocation {
        self.stdin = Some(input.to_string());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Invocation {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// The script text if this is a `sh -c` invocation
    pub fn script(&self) -> Option<&str> {
        match (self.program.as_str(), self.args.as_slice()) {
            ("sh", [flag, script]) if flag == "-c" => Some(script.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(script) = self.script() {
            return write!(f, "{}", script);
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let env_keys: Vec<&str> = self.env.iter().map(|(key, _)| key.as_str()).collect();
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("stdin", &self.stdin.as_ref().map(String::len))
            .field("env", &env_keys)
            .finish()
    }
}
