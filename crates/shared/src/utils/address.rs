use url::Url;

/// Reduces a management controller address to `host` or `host:port`.
///
/// Inventory sources often carry the address wrapped in a scheme and path,
/// e.g. `idrac-virtualmedia://10.0.0.5/redfish/v1/Systems/System.Embedded.1`.
/// Plain hosts and IPs pass through trimmed. Unparsable wrapped forms are
/// returned unchanged so the failure surfaces when the controller is contacted.
pub fn parse_bmc_address(address: &str) -> String {
    let address = address.trim();
    if !address.contains("://") {
        return address.trim_end_matches('/').to_string();
    }

    let Ok(url) = Url::parse(address) else {
        return address.to_string();
    };
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => address.to_string(),
    }
}
