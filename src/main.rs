use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};

use devinfo::commands;

fn filter_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("category")
                .short('c')
                .long("category")
                .value_name("CATEGORY")
                .help("Only show one category (device, network, software, hardware)"),
        )
        .arg(
            Arg::new("search")
                .short('s')
                .long("search")
                .value_name("TEXT")
                .help("Only show items whose title or value contains TEXT"),
        )
        .arg(
            Arg::new("hide-unavailable")
                .long("hide-unavailable")
                .help("Hide items the platform cannot provide")
                .action(ArgAction::SetTrue),
        )
}

fn permission_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(
        Arg::new("permission")
            .help("Permission id, e.g. READ_PHONE_STATE or android.permission.BLUETOOTH_CONNECT")
            .required(true)
            .index(1),
    )
}

fn main() -> Result<()> {
    let matches = Command::new("devinfo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Collects device information into a searchable, live-updating view")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("platform-version")
                .long("platform-version")
                .value_name("API")
                .help("Platform version to evaluate availability against")
                .value_parser(value_parser!(u32))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable log output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            filter_args(Command::new("list").about("Collect once and print the results")).arg(
                Arg::new("json")
                    .long("json")
                    .help("Print items as JSON")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(filter_args(
            Command::new("watch").about("Print the results again whenever they change"),
        ))
        .subcommand(permission_command("grant", "Treat a permission as granted"))
        .subcommand(permission_command("revoke", "Stop treating a permission as granted"))
        .subcommand(Command::new("config").about("Show the current configuration"))
        .get_matches();

    if matches.get_flag("verbose") {
        devinfo::init_logging();
    }

    let version_override = matches.get_one::<u32>("platform-version").copied();

    match matches.subcommand() {
        Some(("list", sub_matches)) => commands::list(sub_matches, version_override),
        Some(("watch", sub_matches)) => commands::watch(sub_matches, version_override),
        Some(("grant", sub_matches)) => commands::config::handle_grant(sub_matches),
        Some(("revoke", sub_matches)) => commands::config::handle_revoke(sub_matches),
        Some(("config", _)) => commands::config::handle_show(),
        _ => {
            println!("Use 'devinfo --help' for more information.");
            Ok(())
        }
    }
}
