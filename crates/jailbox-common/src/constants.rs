//! Registry endpoints, media types, and default values.

/// Docker Hub token endpoint.
pub const AUTH_ENDPOINT: &str = "https://auth.docker.io/token";

/// Registry service name used in the token scope query.
pub const AUTH_SERVICE: &str = "registry.docker.io";

/// Docker Hub registry v2 base URL.
pub const REGISTRY_ENDPOINT: &str = "https://registry.hub.docker.com";

/// Media type of a single v2 image manifest.
pub const MANIFEST_V2_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Media type of a multi-platform v2 manifest list.
pub const MANIFEST_LIST_V2_MEDIA_TYPE: &str =
    "application/vnd.docker.distribution.manifest.list.v2+json";

/// Media type of a single OCI image manifest.
pub const OCI_MANIFEST_MEDIA_TYPE: &str = "application/vnd.oci.image.manifest.v1+json";

/// Media type of an OCI image index.
pub const OCI_INDEX_MEDIA_TYPE: &str = "application/vnd.oci.image.index.v1+json";

/// Tag assumed when an image reference names none.
pub const DEFAULT_TAG: &str = "latest";

/// Default jail root directory, relative to the working directory.
pub const DEFAULT_JAIL_DIR: &str = "jail";

/// Default ceiling on simultaneous in-flight layer downloads.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Platform architecture selected from multi-arch indexes by default.
pub const DEFAULT_ARCHITECTURE: &str = "amd64";

/// Platform OS selected from multi-arch indexes by default.
pub const DEFAULT_OS: &str = "linux";

/// SHA-256 digest length in hex characters.
pub const SHA256_HEX_LENGTH: usize = 64;

/// Exit code surfaced when the child terminates without a translatable
/// status (fault/signal), distinct from any ordinary child exit code.
pub const SIGNAL_EXIT_CODE: i32 = 124;

/// Application name used in CLI output.
pub const APP_NAME: &str = "jailbox";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "jbx";
