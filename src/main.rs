// Entrypoint for the `0x0-upload` command.
// - Builds the uploader for the public 0x0.st instance and runs one upload
//   through the terminal host.
// - Exits non-zero when the upload failed so scripts can tell.

use zerox0_upload::{
    api::HttpTransport,
    config::UploaderConfig,
    host::{run_command, UploadState},
    ui::TerminalHost,
    uploader::Uploader,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let config = UploaderConfig::default();
    log::debug!("Using endpoint {}", config.endpoint);
    let uploader = Uploader::new(config, HttpTransport::new()?);

    let mut host = TerminalHost::new();
    if let UploadState::Failed { .. } = run_command(&mut host, &uploader) {
        std::process::exit(1);
    }
    Ok(())
}
