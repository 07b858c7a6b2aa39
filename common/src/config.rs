pub struct Config {
    /// Base URL of the scanning service, e.g. `http://127.0.0.1:8080`.
    ///
    /// The client never talks to the network directly; every request
    /// goes through this endpoint.
    pub server: String,

    /// Disables the interactive key listener (`q` / Ctrl-C to stop).
    pub disable_input: bool,
}
