//! Request envelope construction.
//!
//! [`Envelope::build`] is the single place where a command name, an optional
//! token and an argument mapping become a validated wire object. Validation
//! runs entirely client-side so a malformed call fails before any socket is
//! opened.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::arguments::{ArgumentValue, Arguments};
use crate::catalog::{ArgKind, CommandDescriptor, lookup};
use crate::error::{ClientError, ValidationError};
use crate::framing::FrameMode;

/// A validated request, ready to be written to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    descriptor: &'static CommandDescriptor,
    token: Option<String>,
    arguments: Arguments,
}

impl Envelope {
    /// Validates `arguments` against the catalog and builds the envelope.
    ///
    /// Optional flags absent from `arguments` are filled in as `false`;
    /// other optional arguments are dropped when empty (`""` or `[]`).
    /// Required text must not be blank. The token is kept only
    /// for authenticated commands.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the command is unknown, an argument
    /// is undeclared or of the wrong kind, a required argument is missing or
    /// empty, or a required token is absent.
    pub fn build(
        command: &str,
        token: Option<&str>,
        arguments: Arguments,
    ) -> Result<Self, ValidationError> {
        let descriptor = lookup(command)?;
        check_declared(descriptor, &arguments)?;
        check_required(descriptor, &arguments)?;
        let token = attach_token(descriptor, token)?;
        Ok(Self {
            descriptor,
            token,
            arguments: normalise(descriptor, arguments),
        })
    }

    /// Command name sent on the wire.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        self.descriptor.name
    }

    /// Catalog entry the envelope was built from.
    #[must_use]
    pub const fn descriptor(&self) -> &'static CommandDescriptor {
        self.descriptor
    }

    /// Token forwarded to the server, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Normalised arguments.
    #[must_use]
    pub const fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Serialises the envelope into the bytes written for `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Serialise`] if JSON encoding fails.
    pub fn to_bytes(&self, mode: FrameMode) -> Result<Vec<u8>, ClientError> {
        let mut bytes = serde_json::to_vec(self).map_err(ClientError::Serialise)?;
        if mode == FrameMode::Newline {
            bytes.push(b'\n');
        }
        Ok(bytes)
    }
}

impl Serialize for Envelope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let field = self.descriptor.argument_field.key();
        let len = 1 + usize::from(self.token.is_some()) + usize::from(field.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("command", self.descriptor.name)?;
        if let Some(token) = &self.token {
            map.serialize_entry("token", token)?;
        }
        if let Some(key) = field {
            map.serialize_entry(key, &self.arguments)?;
        }
        map.end()
    }
}

fn check_declared(
    descriptor: &'static CommandDescriptor,
    arguments: &Arguments,
) -> Result<(), ValidationError> {
    for (name, value) in arguments.iter() {
        let Some(spec) = descriptor.argument(name) else {
            return Err(ValidationError::UnexpectedArgument {
                command: descriptor.name,
                argument: name.to_owned(),
            });
        };
        if spec.kind != value.kind() {
            return Err(ValidationError::ArgumentKind {
                command: descriptor.name,
                argument: spec.name,
                expected: spec.kind,
            });
        }
    }
    Ok(())
}

fn check_required(
    descriptor: &'static CommandDescriptor,
    arguments: &Arguments,
) -> Result<(), ValidationError> {
    match descriptor
        .required
        .iter()
        .find(|spec| arguments.get(spec.name).is_none_or(ArgumentValue::is_blank))
    {
        Some(spec) => Err(ValidationError::MissingArgument {
            command: descriptor.name,
            argument: spec.name,
        }),
        None => Ok(()),
    }
}

fn attach_token(
    descriptor: &'static CommandDescriptor,
    token: Option<&str>,
) -> Result<Option<String>, ValidationError> {
    if !descriptor.requires_token {
        return Ok(None);
    }
    match token.filter(|value| !value.trim().is_empty()) {
        Some(value) => Ok(Some(value.to_owned())),
        None => Err(ValidationError::MissingToken {
            command: descriptor.name,
        }),
    }
}

fn normalise(descriptor: &'static CommandDescriptor, arguments: Arguments) -> Arguments {
    let mut normalised: Arguments = arguments
        .iter()
        .filter(|(name, value)| is_required(descriptor, name) || !value.is_empty())
        .map(|(name, value)| (name.to_owned(), value.clone()))
        .collect();
    for spec in descriptor.optional {
        if spec.kind == ArgKind::Flag && normalised.get(spec.name).is_none() {
            normalised.insert(spec.name, false);
        }
    }
    normalised
}

fn is_required(descriptor: &CommandDescriptor, name: &str) -> bool {
    descriptor.required.iter().any(|spec| spec.name == name)
}
