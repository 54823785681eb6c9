//! Build system generation.
//!
//! The emitted `CMakeLists.txt` links WinHTTP + crypt32 on Windows and
//! libcurl + OpenSSL elsewhere, finds Parson, and registers install/export
//! rules. The emitter is deliberately not parametric over build systems
//! beyond this target; asking for another one is an error.

use std::io::Write;

use super::Error;

/// Configuration for the build script emitter.
#[derive(Debug, Clone, Default)]
pub struct MakeConfig {
    /// CMake project and library name.
    pub project_name: String,
    /// Minimum CMake version; defaults to `3.10`.
    pub min_cmake_version: Option<String>,
    /// Extra source files appended to the target.
    pub extra_sources: Vec<String>,
    /// Build system to target; only `cmake` is supported.
    pub target: Option<String>,
}

/// Emits a `CMakeLists.txt` for the generated SDK.
pub fn emit_cmake(config: &MakeConfig, out: &mut dyn Write) -> Result<(), Error> {
    match config.target.as_deref() {
        None | Some("cmake") => {}
        Some(other) => return Err(Error::UnsupportedTarget(other.to_owned())),
    }

    let project = &config.project_name;
    let min_version = config.min_cmake_version.as_deref().unwrap_or("3.10");

    writeln!(out, "cmake_minimum_required(VERSION {min_version})")?;
    writeln!(out, "project({project} VERSION 0.0.1 LANGUAGES C)")?;
    writeln!(out)?;

    writeln!(out, "set(SOURCES")?;
    writeln!(out, "    \"{project}.c\"")?;
    writeln!(out, "    \"transport_factory.c\"")?;
    writeln!(out, "    \"http_types.c\"")?;
    writeln!(out, "    \"str_utils.c\"")?;
    writeln!(out, "    \"fs.c\"")?;
    for source in &config.extra_sources {
        writeln!(out, "    \"{source}\"")?;
    }
    writeln!(out, ")")?;
    writeln!(out)?;

    writeln!(out, "if(WIN32)")?;
    writeln!(
        out,
        "    list(APPEND SOURCES \"http_winhttp.c\" \"crypto_wincrypt.c\")"
    )?;
    writeln!(out, "    add_compile_definitions(USE_WINHTTP)")?;
    writeln!(out, "else()")?;
    writeln!(
        out,
        "    list(APPEND SOURCES \"http_curl.c\" \"crypto_openssl.c\")"
    )?;
    writeln!(out, "    find_package(CURL REQUIRED)")?;
    writeln!(out, "    find_package(OpenSSL REQUIRED)")?;
    writeln!(out, "endif()")?;
    writeln!(out)?;

    writeln!(out, "find_package(parson CONFIG REQUIRED)")?;
    writeln!(out)?;

    writeln!(out, "add_library({project} ${{SOURCES}})")?;
    writeln!(out)?;

    writeln!(out, "if(WIN32)")?;
    writeln!(
        out,
        "    target_link_libraries({project} PRIVATE winhttp crypt32)"
    )?;
    writeln!(out, "else()")?;
    writeln!(
        out,
        "    target_link_libraries({project} PRIVATE CURL::libcurl OpenSSL::SSL OpenSSL::Crypto)"
    )?;
    writeln!(out, "endif()")?;
    writeln!(out, "target_link_libraries({project} PRIVATE parson::parson)")?;
    writeln!(out)?;

    writeln!(out, "include(GNUInstallDirs)")?;
    writeln!(out, "install(TARGETS {project} EXPORT {project}Targets")?;
    writeln!(out, "        LIBRARY DESTINATION ${{CMAKE_INSTALL_LIBDIR}}")?;
    writeln!(out, "        ARCHIVE DESTINATION ${{CMAKE_INSTALL_LIBDIR}})")?;

    Ok(())
}
