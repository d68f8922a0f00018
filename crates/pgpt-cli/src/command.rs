//! Maps parsed subcommands onto catalog commands and wire argument names.

use pgpt_client::Arguments;

use crate::cli::{CliCommand, UserFields};

/// A catalog command together with the arguments gathered from its flags.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CommandInvocation {
    pub(crate) command: &'static str,
    pub(crate) arguments: Arguments,
}

impl CommandInvocation {
    fn new(command: &'static str, arguments: Arguments) -> Self {
        Self { command, arguments }
    }

    fn bare(command: &'static str) -> Self {
        Self::new(command, Arguments::new())
    }
}

impl From<CliCommand> for CommandInvocation {
    fn from(command: CliCommand) -> Self {
        match command {
            CliCommand::Login { email, password } => Self::new(
                "login",
                Arguments::new()
                    .with_optional("email", email)
                    .with_optional("password", password),
            ),
            CliCommand::Logout => Self::bare("logout"),
            CliCommand::Chat {
                question,
                use_public,
                groups,
                language,
            } => Self::new(
                "chat",
                Arguments::new()
                    .with_optional("question", question)
                    .with("usePublic", use_public)
                    .with("groups", groups)
                    .with("language", language),
            ),
            CliCommand::ContinueChat { chat_id, question } => Self::new(
                "continue_chat",
                Arguments::new()
                    .with_optional("chatId", chat_id)
                    .with_optional("question", question),
            ),
            CliCommand::GetChatInfo { chat_id } => Self::new(
                "get_chat_info",
                Arguments::new().with_optional("chatId", chat_id),
            ),
            CliCommand::DeleteChat { chat_id } => Self::new(
                "delete_chat",
                Arguments::new().with_optional("chatId", chat_id),
            ),
            CliCommand::CreateSource {
                name,
                content,
                groups,
            } => Self::new(
                "create_source",
                Arguments::new()
                    .with_optional("name", name)
                    .with_optional("content", content)
                    .with("groups", groups),
            ),
            CliCommand::GetSource { source_id } => Self::new(
                "get_source",
                Arguments::new().with_optional("sourceId", source_id),
            ),
            CliCommand::ListSources { group_name } => Self::new(
                "list_sources",
                Arguments::new().with_optional("groupName", group_name),
            ),
            CliCommand::EditSource {
                source_id,
                title,
                content,
                groups,
            } => Self::new(
                "edit_source",
                Arguments::new()
                    .with_optional("sourceId", source_id)
                    .with_optional("title", title)
                    .with_optional("content", content)
                    .with("groups", groups),
            ),
            CliCommand::DeleteSource { source_id } => Self::new(
                "delete_source",
                Arguments::new().with_optional("sourceId", source_id),
            ),
            CliCommand::ListGroups => Self::bare("list_groups"),
            CliCommand::StoreGroup {
                group_name,
                description,
            } => Self::new(
                "store_group",
                Arguments::new()
                    .with_optional("groupName", group_name)
                    .with_optional("description", description),
            ),
            CliCommand::DeleteGroup { group_name } => Self::new(
                "delete_group",
                Arguments::new().with_optional("groupName", group_name),
            ),
            CliCommand::StoreUser {
                user,
                language,
                timezone,
            } => Self::new(
                "store_user",
                user_arguments(user)
                    .with("language", language)
                    .with("timezone", timezone),
            ),
            CliCommand::EditUser {
                user,
                language,
                timezone,
            } => Self::new(
                "edit_user",
                user_arguments(user)
                    .with_optional("language", language)
                    .with_optional("timezone", timezone),
            ),
            CliCommand::DeleteUser { email } => Self::new(
                "delete_user",
                Arguments::new().with_optional("email", email),
            ),
            CliCommand::Keygen { password } => Self::new(
                "keygen",
                Arguments::new().with_optional("password", password),
            ),
        }
    }
}

fn user_arguments(user: UserFields) -> Arguments {
    Arguments::new()
        .with_optional("name", user.name)
        .with_optional("email", user.email)
        .with_optional("password", user.password)
        .with("roles", user.roles)
        .with("groups", user.groups)
        .with("usePublic", user.use_public)
        .with("activateFtp", user.activate_ftp)
        .with_optional("ftpPassword", user.ftp_password)
}
