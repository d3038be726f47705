// Library root
// -----------
// Uploads one local file to 0x0.st and hands back the link. The binary
// (`main.rs`) wires these modules to a terminal; other front-ends only need
// their own `host::Host`.
//
// Module responsibilities:
// - `config`: endpoint and User-Agent.
// - `api`: the multipart POST (`Transport`) and its reqwest implementation.
// - `uploader`: read file, POST, normalize the plain-text answer.
// - `host`: the capability set a front-end provides and the command flow.
// - `ui`: the terminal front-end.
// - `errors`: error types shared by the above.
pub mod api;
pub mod config;
pub mod errors;
pub mod host;
pub mod ui;
pub mod uploader;
