//! Parsing of the runtime's single-line container status report.

/// `ps --format` template producing `id|status|ports`.
pub const STATUS_FORMAT: &str = "{{.ID}}|{{.Status}}|{{.Ports}}";

/// Placeholder for fields missing from a short status line.
pub const UNKNOWN_FIELD: &str = "Unknown";

const SHORT_ID_LEN: usize = 12;

/// The managed container as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSnapshot {
    pub id: String,
    pub status: String,
    pub ports: String,
}

impl ContainerSnapshot {
    /// First host port published in `ports` (`0.0.0.0:9090->80/tcp, ...`).
    pub fn host_port(&self) -> Option<u16> {
        self.ports.split(',').find_map(|mapping| {
            let (host, _) = mapping.split_once("->")?;
            host.trim().rsplit(':').next()?.parse().ok()
        })
    }
}

/// Observed state of the managed deployment. A stopped container is not
/// listed by the runtime and therefore reads as `Inactive`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentState {
    Active(ContainerSnapshot),
    Inactive,
}

/// Truncate a runtime identifier to its short form.
pub fn short_id(id: &str) -> String {
    id.trim().chars().take(SHORT_ID_LEN).collect()
}

/// Interpret `STATUS_FORMAT` output. Empty output means inactive; missing
/// fields are replaced by [`UNKNOWN_FIELD`].
pub fn parse_status(stdout: &str) -> DeploymentState {
    let Some(line) = stdout.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return DeploymentState::Inactive;
    };

    let mut fields = line.split('|').map(str::trim);
    let mut next_field = || {
        fields
            .next()
            .filter(|f| !f.is_empty())
            .unwrap_or(UNKNOWN_FIELD)
            .to_string()
    };
    let id = short_id(&next_field());
    let status = next_field();
    let ports = next_field();

    DeploymentState::Active(ContainerSnapshot { id, status, ports })
}
