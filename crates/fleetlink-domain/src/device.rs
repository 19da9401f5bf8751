/// Registry view of a device, used for reachability checks before issuing a
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub scope_id: String,
    pub device_id: String,
    pub client_id: String,
    pub display_name: String,
    pub connected: bool,
}
