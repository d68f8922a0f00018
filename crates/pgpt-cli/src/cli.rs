//! Command-line grammar for the `pgpt` binary.
//!
//! Subcommand flags are all optional at the parser level. Required
//! arguments are enforced by the client when the envelope is built, so a
//! missing flag produces the same validation error whichever way the
//! command is invoked.

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "pgpt",
    version,
    about = "Sends one command to a PGPT server and prints the response.",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    /// Controls how structured responses are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto, global = true)]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Authenticates a user and prints the issued token.
    Login {
        /// Account e-mail address.
        #[arg(long)]
        email: Option<String>,
        /// Account password.
        #[arg(long)]
        password: Option<String>,
    },
    /// Ends the session identified by the configured token.
    Logout,
    /// Starts a new chat.
    Chat {
        /// Question to ask.
        #[arg(long)]
        question: Option<String>,
        /// Includes the public knowledge base.
        #[arg(long)]
        use_public: bool,
        /// Groups whose sources are searched.
        #[arg(long, num_args = 1..)]
        groups: Vec<String>,
        /// Answer language.
        #[arg(long, default_value = "de")]
        language: String,
    },
    /// Asks a follow-up question in an existing chat.
    ContinueChat {
        /// Chat identifier.
        #[arg(long)]
        chat_id: Option<String>,
        /// Follow-up question.
        #[arg(long)]
        question: Option<String>,
    },
    /// Shows the history of a chat.
    GetChatInfo {
        /// Chat identifier.
        #[arg(long)]
        chat_id: Option<String>,
    },
    /// Deletes a chat.
    DeleteChat {
        /// Chat identifier.
        #[arg(long)]
        chat_id: Option<String>,
    },
    /// Uploads a new source.
    CreateSource {
        /// Source name.
        #[arg(long)]
        name: Option<String>,
        /// Markdown content.
        #[arg(long)]
        content: Option<String>,
        /// Groups the source belongs to.
        #[arg(long, num_args = 1..)]
        groups: Vec<String>,
    },
    /// Shows one source.
    GetSource {
        /// Source identifier.
        #[arg(long)]
        source_id: Option<String>,
    },
    /// Lists the sources of a group.
    ListSources {
        /// Group to list.
        #[arg(long)]
        group_name: Option<String>,
    },
    /// Updates an existing source.
    EditSource {
        /// Source identifier.
        #[arg(long)]
        source_id: Option<String>,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New content.
        #[arg(long)]
        content: Option<String>,
        /// Replacement group list.
        #[arg(long, num_args = 1..)]
        groups: Vec<String>,
    },
    /// Deletes a source.
    DeleteSource {
        /// Source identifier.
        #[arg(long)]
        source_id: Option<String>,
    },
    /// Lists the groups visible to the caller.
    ListGroups,
    /// Creates a group.
    StoreGroup {
        /// Group name.
        #[arg(long)]
        group_name: Option<String>,
        /// Group description.
        #[arg(long)]
        description: Option<String>,
    },
    /// Deletes a group.
    DeleteGroup {
        /// Group name.
        #[arg(long)]
        group_name: Option<String>,
    },
    /// Creates a user.
    StoreUser {
        #[command(flatten)]
        user: UserFields,
        /// Preferred language.
        #[arg(long, default_value = "en")]
        language: String,
        /// Time zone.
        #[arg(long, default_value = "Europe/Berlin")]
        timezone: String,
    },
    /// Updates a user; only the fields given are sent, flags always are.
    EditUser {
        #[command(flatten)]
        user: UserFields,
        /// Preferred language.
        #[arg(long)]
        language: Option<String>,
        /// Time zone.
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Deletes a user.
    DeleteUser {
        /// Account e-mail address.
        #[arg(long)]
        email: Option<String>,
    },
    /// Generates a key protected by the given password.
    Keygen {
        /// Password protecting the key.
        #[arg(long)]
        password: Option<String>,
    },
}

/// Flags shared by `store-user` and `edit-user`.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct UserFields {
    /// Display name.
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Account e-mail address.
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// Account password.
    #[arg(long)]
    pub(crate) password: Option<String>,
    /// Roles granted to the user.
    #[arg(long, num_args = 1..)]
    pub(crate) roles: Vec<String>,
    /// Groups the user belongs to.
    #[arg(long, num_args = 1..)]
    pub(crate) groups: Vec<String>,
    /// Grants access to the public knowledge base.
    #[arg(long)]
    pub(crate) use_public: bool,
    /// Enables FTP access.
    #[arg(long)]
    pub(crate) activate_ftp: bool,
    /// FTP password.
    #[arg(long)]
    pub(crate) ftp_password: Option<String>,
}
