//! Directory commands: users, programs and document types.

use docbinder_store::DirectoryStore;
use docbinder_types::{User, UserId};

use crate::cli::UserAddArgs;
use crate::config::CliConfig;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{NamedOutput, OutputFormat, Render, UserOutput};

/// Execute `user add`.
pub fn user_add(config: CliConfig, format: OutputFormat, args: UserAddArgs) -> CliResult<String> {
    let mut ctx = AppContext::open(config)?;

    let program = args
        .program
        .as_deref()
        .map(|name| ctx.program_id(name))
        .transpose()?;

    let user = User {
        id: UserId(0),
        username: args.username,
        full_name: args.name,
        email: args.email,
        is_superuser: args.superuser,
        permissions: args.permissions.into_iter().collect(),
        groups: args.groups.into_iter().collect(),
        program,
    };
    let user = ctx.ops.state.directory.add_user(&user)?;

    let output = UserOutput {
        id: user.id.get(),
        username: user.username.clone(),
        full_name: user.full_name.clone(),
        email: user.email.clone(),
        superuser: user.is_superuser,
        permissions: user.permissions.iter().map(|p| p.to_string()).collect(),
        groups: user.groups.iter().cloned().collect(),
        program: args.program,
    };
    Ok(output.render(format))
}

/// Execute `program add`.
pub fn program_add(config: CliConfig, format: OutputFormat, name: &str) -> CliResult<String> {
    let mut ctx = AppContext::open(config)?;
    let program = ctx.ops.state.directory.add_program(name)?;

    let output = NamedOutput {
        kind: "program",
        id: program.id.get(),
        name: program.name,
    };
    Ok(output.render(format))
}

/// Execute `type add`.
pub fn type_add(config: CliConfig, format: OutputFormat, name: &str) -> CliResult<String> {
    let mut ctx = AppContext::open(config)?;
    let document_type = ctx.ops.state.directory.add_document_type(name)?;

    let output = NamedOutput {
        kind: "document type",
        id: document_type.id.get(),
        name: document_type.name,
    };
    Ok(output.render(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{json, setup_library, user_args};
    use crate::error::CliError;
    use docbinder_types::{Permission, GUEST_GROUP};
    use tempfile::TempDir;

    #[test]
    fn test_user_add_guest_with_program() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_library(&temp_dir);

        let mut args = user_args("visitor", &[Permission::View]);
        args.groups = vec![GUEST_GROUP.to_string()];
        args.program = Some("Business Support".to_string());
        let output = user_add(config.clone(), OutputFormat::Json, args).unwrap();

        let value = json(&output);
        assert_eq!(value["program"], "Business Support");
        assert_eq!(value["permissions"][0], "view");

        let ctx = AppContext::open(config).unwrap();
        let user = ctx.actor(Some("visitor")).unwrap();
        assert!(user.is_guest());
        assert!(user.program.is_some());
    }

    #[test]
    fn test_user_add_unknown_program() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_library(&temp_dir);

        let mut args = user_args("visitor", &[Permission::View]);
        args.program = Some("Arts".to_string());
        let err = user_add(config, OutputFormat::Json, args).unwrap_err();
        assert!(matches!(err, CliError::NotFound { kind: "program", .. }));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_library(&temp_dir);

        assert!(type_add(config.clone(), OutputFormat::Json, "Report").is_err());
        assert!(program_add(config.clone(), OutputFormat::Json, "Business Support").is_err());
        let again = user_add(config, OutputFormat::Json, user_args("john", &[]));
        assert!(again.is_err());
    }
}
