use gradle_runner::Error;

fn main() {
    match gradle_runner::run() {
        Ok(true) => {}
        Ok(false) => {
            log::error!("Gradle step failed");
            std::process::exit(1);
        }
        Err(e) => {
            log::error!("Application error: {}", e);
            match e {
                Error::Io(io_err) => eprintln!("Error: A file system I/O error occurred: {}", io_err),
                Error::Config(msg) => eprintln!("Error: Configuration issue: {}", msg),
                Error::TomlRead(err) => eprintln!("Error: Could not parse configuration file: {}", err),
                Error::TomlWrite(err) => eprintln!("Error: Could not save installations: {}", err),
                Error::Json(err) => eprintln!("Error: Could not read legacy configuration: {}", err),
                Error::ExecutableNotFound { installation, path, node } => eprintln!(
                    "Error: Installation '{}' is missing {:?} on node '{}'",
                    installation, path, node
                ),
                Error::Channel(msg) => eprintln!("Error: Node communication failed: {}", msg),
            }
            std::process::exit(1);
        }
    }
}
