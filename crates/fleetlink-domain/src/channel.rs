use std::fmt;

/// Request verb carried by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Read,
    Write,
    Execute,
    Create,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Read => "READ",
            Method::Write => "WRITE",
            Method::Execute => "EXECUTE",
            Method::Create => "CREATE",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured address of a message: application, version, verb and resource path.
///
/// Identity is the full segment sequence; two channels are equal only if every
/// segment matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel {
    pub app_name: String,
    pub app_version: String,
    pub method: Method,
    pub resource: Vec<String>,
}

impl Channel {
    pub fn new(
        app_name: impl Into<String>,
        app_version: impl Into<String>,
        method: Method,
        resource: Vec<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            app_version: app_version.into(),
            method,
            resource,
        }
    }

    /// Resource path joined with `/`, as recorded on management operations.
    pub fn resource_path(&self) -> String {
        self.resource.join("/")
    }
}
