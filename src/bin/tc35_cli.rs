// ABOUTME: Command-line tool exercising the TC35 driver over a real serial port
// ABOUTME: One flag per action: alive check, module info, dial, hang up, pick up, send SMS

pub(crate) use argh::FromArgs;
use tc35::{Credentials, MessageStatus, SerialConfig, Session, StartOutcome};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Drive a Siemens TC35 GSM module over its serial AT-command link
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debug logging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the serial port the module is attached to (default: /dev/ttyUSB0)
    #[argh(option, short = 's')]
    port: Option<String>,

    /// the baud rate (default: 115200)
    #[argh(option, short = 'b')]
    baud: Option<u32>,

    /// the SIM PIN, if one is set
    #[argh(option)]
    pin: Option<String>,

    /// check that the module answers and exit
    #[argh(switch)]
    is_alive: bool,

    /// print module and network information
    #[argh(switch)]
    info: bool,

    /// dial this number as a voice call
    #[argh(option)]
    call: Option<String>,

    /// hang up the current call
    #[argh(switch)]
    hang_up: bool,

    /// pick up an incoming call
    #[argh(switch)]
    pick_up: bool,

    /// the recipient for --message
    #[argh(option, short = 't')]
    to: Option<String>,

    /// send this text as an SMS (requires --to)
    #[argh(option, short = 'm')]
    message: Option<String>,

    /// list stored messages
    #[argh(switch)]
    list_sms: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli_args: CliArgs = argh::from_env();

    let level = if cli_args.debugging {
        Level::TRACE
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let port = cli_args
        .port
        .unwrap_or_else(|| "/dev/ttyUSB0".to_owned());
    let config = SerialConfig::new(port).baud_rate(cli_args.baud.unwrap_or(115_200));

    let mut session = Session::open(&config)?;

    let mut credentials = Credentials::default();
    if let Some(pin) = cli_args.pin {
        credentials = credentials.pin(pin);
    }
    match session.start(&credentials)? {
        StartOutcome::Ready => {}
        StartOutcome::AwaitingCredential(state) => {
            eprintln!("SIM locked: {state} (pass it with --pin)");
            std::process::exit(1);
        }
    }

    if cli_args.is_alive {
        println!("alive: {}", session.is_alive()?);
    }

    if cli_args.info {
        println!("manufacturer: {}", session.manufacturer()?);
        println!("model:        {}", session.model()?);
        println!("revision:     {}", session.revision()?);
        println!("IMEI:         {}", session.imei()?);
        println!("operator:     {}", session.operator_name()?);
        match session.signal_strength_dbm()? {
            Some(dbm) => println!("signal:       {dbm} dBm"),
            None => println!("signal:       unknown"),
        }
        println!("clock:        {}", session.clock()?);
    }

    if let Some(number) = cli_args.call {
        session.dial(&number)?;
        println!("dialing {number}");
    }

    if cli_args.hang_up {
        session.hang_up()?;
        println!("hung up");
    }

    if cli_args.pick_up {
        session.pick_up()?;
        println!("picked up");
    }

    if let Some(message) = cli_args.message {
        let Some(to) = cli_args.to else {
            eprintln!("--message requires --to");
            std::process::exit(1);
        };
        let parts = session.send_sms(&to, &message)?;
        println!("sent in {parts} part(s)");
    }

    if cli_args.list_sms {
        for record in session.receive_sms(MessageStatus::All)? {
            println!(
                "[{}] {} {} ({}): {}",
                record.index, record.timestamp, record.number, record.charset, record.body
            );
        }
    }

    Ok(())
}
