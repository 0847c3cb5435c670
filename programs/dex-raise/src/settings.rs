//! Deployment settings of the dex-raise program.
//!
//! Settings are fixed per deployment: the program id, the key allowed to run
//! `Initialize`, and the protocol fee ceiling. They can be loaded from a YAML
//! file:
//!
//! ```yaml
//! program_id: 7F6rVPdLuDi15Mdoq57wwEnNPQnshfW6z7gDYHoQP3o3
//! initialization_authority: EwP2v1nmR5j5YoqeXPHkhNBJaGBRJs2HLD6FVwr9q7wN
//! max_fee_basis_points: 1000
//! ```

use {
    crate::constants::MAX_BASIS_POINTS,
    serde::{Deserialize, Serialize},
    solana_pubkey::Pubkey,
    std::{fs, path::Path, str::FromStr},
    thiserror::Error,
};

/// Errors raised while loading or validating [`ProgramSettings`].
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid pubkey for `{field}`: {value}")]
    InvalidPubkey { field: &'static str, value: String },

    #[error("invalid settings: {reason}")]
    Invalid { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSettings {
    /// Id of the deployed program; owns the config account.
    pub program_id: Pubkey,

    /// The only key allowed to sign `Initialize` (the deployer).
    pub initialization_authority: Pubkey,

    /// Highest `fee_basis_points` accepted at initialization.
    pub max_fee_basis_points: u16,
}

/// On-disk form; pubkeys are base58 strings.
#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    program_id: Option<String>,
    initialization_authority: String,
    #[serde(default)]
    max_fee_basis_points: Option<u16>,
}

impl ProgramSettings {
    /// Settings for the built-in program id with the full basis-point range.
    pub fn new(initialization_authority: Pubkey) -> Self {
        Self {
            program_id: crate::id(),
            initialization_authority,
            max_fee_basis_points: MAX_BASIS_POINTS,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = serde_yaml::from_str(contents)?;
        let settings = Self {
            program_id: match file.program_id {
                Some(value) => parse_pubkey("program_id", value)?,
                None => crate::id(),
            },
            initialization_authority: parse_pubkey(
                "initialization_authority",
                file.initialization_authority,
            )?,
            max_fee_basis_points: file.max_fee_basis_points.unwrap_or(MAX_BASIS_POINTS),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_yaml_string(&self) -> Result<String, SettingsError> {
        let file = SettingsFile {
            program_id: Some(self.program_id.to_string()),
            initialization_authority: self.initialization_authority.to_string(),
            max_fee_basis_points: Some(self.max_fee_basis_points),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_fee_basis_points > MAX_BASIS_POINTS {
            return Err(SettingsError::Invalid {
                reason: format!(
                    "max_fee_basis_points {} exceeds {MAX_BASIS_POINTS}",
                    self.max_fee_basis_points
                ),
            });
        }
        if self.initialization_authority == Pubkey::default() {
            return Err(SettingsError::Invalid {
                reason: "initialization_authority must not be the default pubkey".to_string(),
            });
        }
        if self.program_id == Pubkey::default() {
            return Err(SettingsError::Invalid {
                reason: "program_id must not be the default pubkey".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_pubkey(field: &'static str, value: String) -> Result<Pubkey, SettingsError> {
    Pubkey::from_str(&value).map_err(|_| SettingsError::InvalidPubkey { field, value })
}
