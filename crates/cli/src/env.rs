use crate::error::CliError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Environment variable manager that loads from the system environment and
/// from .env files, file values winning over inherited ones.
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Load variables from a .env file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub(crate) fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse KEY=VALUE format
            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim();
                let value = line[eq_pos + 1..].trim();

                if key.is_empty() {
                    return Err(CliError::Config(format!(
                        "Invalid env file: empty key at line {}",
                        line_num + 1
                    )));
                }

                let value = Self::unquote_value(value);
                self.vars.insert(key.to_string(), value);
            } else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            }
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
            return value[1..value.len() - 1].to_string();
        }

        if value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2 {
            return value[1..value.len() - 1].to_string();
        }

        value.to_string()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}
