/// Base name of the library the toolchain produces.
pub const DEFAULT_LIBRARY_NAME: &str = "GameAnalytics";

pub const ENV_SOURCE_DIR: &str = "SDKPACK_SOURCE_DIR";
pub const ENV_BUILD_DIR: &str = "SDKPACK_BUILD_DIR";
pub const ENV_PACKAGE_DIR: &str = "SDKPACK_PACKAGE_DIR";
pub const ENV_INCLUDE_DIR: &str = "SDKPACK_INCLUDE_DIR";
pub const ENV_LIBRARY_NAME: &str = "SDKPACK_LIBRARY_NAME";
pub const ENV_RELEASE_REPO: &str = "SDKPACK_RELEASE_REPO";
pub const ENV_CMAKE: &str = "SDKPACK_CMAKE";
pub const ENV_CTEST: &str = "SDKPACK_CTEST";
