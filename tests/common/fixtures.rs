//! Stub tool fixtures.
//!
//! Each stub answers `--version` (for preflight probes), appends one line
//! per real invocation to `$PROVIS_TEST_LOG` recording its arguments and
//! physical working directory, and exits with an env-controlled code.

use super::env::TestEnv;

/// Frontend package manager stub. Fails like the real tool when the
/// manifest is missing from the working directory.
pub const NPM_STUB: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then echo "10.2.0"; exit 0; fi
echo "npm $* cwd=$(pwd -P)" >> "$PROVIS_TEST_LOG"
if [ ! -f package.json ]; then
  echo "npm ERR! could not read package.json" >&2
  exit 254
fi
exit "${NPM_EXIT_CODE:-0}"
"#;

/// Backend package installer stub
pub const PIP_STUB: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then echo "pip 24.0"; exit 0; fi
echo "pip $* cwd=$(pwd -P)" >> "$PROVIS_TEST_LOG"
exit "${PIP_EXIT_CODE:-0}"
"#;

/// Collaborator image-pull script
pub const IMAGE_SCRIPT: &str = r#"#!/bin/sh
echo "images cwd=$(pwd -P)" >> "$PROVIS_TEST_LOG"
exit "${IMAGES_EXIT_CODE:-0}"
"#;

/// Set up a fully provisioned-looking project: stubs for both package
/// managers, a frontend manifest, and the image script.
pub fn prepared_project() -> TestEnv {
    let env = TestEnv::new();
    env.install_stub("npm", NPM_STUB);
    env.install_stub("pip", PIP_STUB);
    env.write_frontend_manifest();
    env.write_image_script(IMAGE_SCRIPT);
    env
}
