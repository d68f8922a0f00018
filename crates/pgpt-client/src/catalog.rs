//! Static table of the commands the server understands.
//!
//! Each [`CommandDescriptor`] records the argument contract for one command,
//! including the historical shape deviations: `list_sources` carries its
//! arguments under `attributes`, while `logout` and `list_groups` send no
//! argument object at all.

use strum::Display;

use crate::error::ValidationError;

/// Value kind accepted for an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ArgKind {
    /// A string value.
    Text,
    /// A boolean switch.
    Flag,
    /// An ordered sequence of strings.
    List,
    /// A nested mapping.
    Map,
}

/// Name and kind of a single command argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgSpec {
    /// Wire name of the argument.
    pub name: &'static str,
    /// Kind of value the argument carries.
    pub kind: ArgKind,
}

/// Envelope member that carries the argument mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentField {
    /// Arguments travel under `arguments`.
    Arguments,
    /// Arguments travel under `attributes`.
    Attributes,
    /// The envelope has no argument member.
    Omitted,
}

impl ArgumentField {
    /// JSON key used for the argument mapping, if any.
    #[must_use]
    pub const fn key(self) -> Option<&'static str> {
        match self {
            Self::Arguments => Some("arguments"),
            Self::Attributes => Some("attributes"),
            Self::Omitted => None,
        }
    }
}

/// Whether a call site needs a structured response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// The response must decode as JSON.
    Structured,
    /// The response is displayed as text; JSON is used when it parses.
    Text,
}

/// Argument contract for one command.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Command name sent on the wire.
    pub name: &'static str,
    /// Whether the envelope carries a `token`.
    pub requires_token: bool,
    /// Envelope member used for arguments.
    pub argument_field: ArgumentField,
    /// Arguments that must be present and non-empty.
    pub required: &'static [ArgSpec],
    /// Arguments that may be supplied.
    pub optional: &'static [ArgSpec],
    /// Decoding policy for the response.
    pub response: ResponseKind,
}

impl CommandDescriptor {
    /// Finds the declaration for `name`, if the command accepts it.
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&'static ArgSpec> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .find(|spec| spec.name == name)
    }
}

const fn text(name: &'static str) -> ArgSpec {
    ArgSpec {
        name,
        kind: ArgKind::Text,
    }
}

const fn flag(name: &'static str) -> ArgSpec {
    ArgSpec {
        name,
        kind: ArgKind::Flag,
    }
}

const fn list(name: &'static str) -> ArgSpec {
    ArgSpec {
        name,
        kind: ArgKind::List,
    }
}

const fn authenticated(
    name: &'static str,
    required: &'static [ArgSpec],
    optional: &'static [ArgSpec],
    response: ResponseKind,
) -> CommandDescriptor {
    CommandDescriptor {
        name,
        requires_token: true,
        argument_field: ArgumentField::Arguments,
        required,
        optional,
        response,
    }
}

const USER_FIELDS: &[ArgSpec] = &[
    text("name"),
    text("email"),
    text("password"),
    text("language"),
    text("timezone"),
    list("roles"),
    list("groups"),
    flag("usePublic"),
    flag("activateFtp"),
    text("ftpPassword"),
];

/// Every command supported by the client.
pub static CATALOG: &[CommandDescriptor] = &[
    CommandDescriptor {
        name: "login",
        requires_token: false,
        argument_field: ArgumentField::Arguments,
        required: &[text("email"), text("password")],
        optional: &[],
        response: ResponseKind::Structured,
    },
    CommandDescriptor {
        name: "logout",
        requires_token: true,
        argument_field: ArgumentField::Omitted,
        required: &[],
        optional: &[],
        response: ResponseKind::Text,
    },
    authenticated(
        "chat",
        &[text("question")],
        &[flag("usePublic"), list("groups"), text("language")],
        ResponseKind::Structured,
    ),
    authenticated(
        "continue_chat",
        &[text("chatId"), text("question")],
        &[],
        ResponseKind::Text,
    ),
    authenticated(
        "get_chat_info",
        &[text("chatId")],
        &[],
        ResponseKind::Structured,
    ),
    authenticated("delete_chat", &[text("chatId")], &[], ResponseKind::Text),
    authenticated(
        "create_source",
        &[text("name"), text("content")],
        &[list("groups")],
        ResponseKind::Text,
    ),
    authenticated("get_source", &[text("sourceId")], &[], ResponseKind::Text),
    CommandDescriptor {
        name: "list_sources",
        requires_token: true,
        argument_field: ArgumentField::Attributes,
        required: &[text("groupName")],
        optional: &[],
        response: ResponseKind::Text,
    },
    authenticated(
        "edit_source",
        &[text("sourceId")],
        &[text("title"), text("content"), list("groups")],
        ResponseKind::Text,
    ),
    authenticated("delete_source", &[text("sourceId")], &[], ResponseKind::Text),
    CommandDescriptor {
        name: "list_groups",
        requires_token: true,
        argument_field: ArgumentField::Omitted,
        required: &[],
        optional: &[],
        response: ResponseKind::Structured,
    },
    authenticated(
        "store_group",
        &[text("groupName")],
        &[text("description")],
        ResponseKind::Text,
    ),
    authenticated("delete_group", &[text("groupName")], &[], ResponseKind::Text),
    authenticated(
        "store_user",
        &[text("name"), text("email"), text("password")],
        &[
            text("language"),
            text("timezone"),
            list("roles"),
            list("groups"),
            flag("usePublic"),
            flag("activateFtp"),
            text("ftpPassword"),
        ],
        ResponseKind::Text,
    ),
    authenticated("edit_user", &[], USER_FIELDS, ResponseKind::Text),
    authenticated("delete_user", &[text("email")], &[], ResponseKind::Text),
    authenticated("keygen", &[text("password")], &[], ResponseKind::Text),
];

/// Looks up the descriptor for `name`.
///
/// # Errors
///
/// Returns [`ValidationError::UnknownCommand`] when the catalog has no entry.
pub fn lookup(name: &str) -> Result<&'static CommandDescriptor, ValidationError> {
    CATALOG
        .iter()
        .find(|descriptor| descriptor.name == name)
        .ok_or_else(|| ValidationError::UnknownCommand(name.to_owned()))
}
