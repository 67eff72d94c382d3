use clap::{crate_version, Arg, ArgAction, Command};

fn charset_arg() -> Arg {
    Arg::new("charset").short('c').long("charset").help("character set of the MSX machine").value_name("NAME")
        .required(false)
        .default_value("ja")
        .long_help("region name of the character set, e.g. `ja`; known but
unimplemented regions are reported distinctly from unknown names")
}

fn addr_arg() -> Arg {
    Arg::new("addr").short('a').long("addr").help("load address of the tokenized program").value_name("ADDRESS")
        .required(false)
        .default_value("32769")
}

fn console_arg() -> Arg {
    Arg::new("console").long("console").help("format for console unconditionally")
        .required(false)
        .action(ArgAction::SetTrue)
        .long_help("even if the output context is a file or pipe, format it for the console")
}

pub fn build_cli() -> Command {
    let long_help = "msxtok is always invoked with exactly one of several subcommands.
The subcommands are generally designed to function as nodes in a pipeline.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
tokenize to file:       `msxtok tokenize < prog.asc > prog.bas`
detokenize a disk file: `msxtok detokenize < prog.bas`
expanded listing:       `msxtok detokenize --expand < prog.bas > prog.baz`
round trip:             `msxtok detokenize < prog.bas | msxtok tokenize`
hex dump:               `msxtok dump < prog.bas";

    let mut main_cmd = Command::new("msxtok")
        .about("Converts MSX-BASIC programs between tokenized and text form.")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(
        Command::new("tokenize")
            .arg(addr_arg())
            .arg(charset_arg())
            .arg(
                Arg::new("old").long("old").help("apply the 63999 line number limit of early interpreters")
                    .action(ArgAction::SetTrue),
            )
            .arg(console_arg())
            .visible_alias("tok")
            .about("read text from stdin, tokenize, write .BAS file to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("detokenize")
            .arg(addr_arg())
            .arg(charset_arg())
            .arg(
                Arg::new("expand").short('e').long("expand").help("produce an expanded listing for editing")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("binary").short('b').long("binary").help("leave string contents as native bytes")
                    .action(ArgAction::SetTrue)
                    .long_help("skip charset translation, emitting string and comment contents
as the native bytes found in the program; the result is not valid UTF8
unless the program happens to use only ASCII"),
            )
            .visible_alias("dtok")
            .about("read .BAS file from stdin, detokenize, write text to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("dump")
            .arg(addr_arg())
            .about("read .BAS file from stdin, write hex dump to stdout"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("completions")
            .arg(
                Arg::new("shell").short('s').long("shell").help("shell target").value_name("NAME")
                    .required(true)
                    .value_parser(["bash","elv","fish","ps1","zsh"])
            )
            .about("write completions script to stdout for the specified shell")
    );
    return main_cmd;
}
