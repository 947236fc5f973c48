//! Artifact signing utility.
//!
//! Creates a signed manifest (`manifest.json`) and Ed25519 signature
//! (`model.sig`) binding `model.json` and `model_features.json`, so the
//! application can verify the artifacts at startup.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin sign_artifacts -- <model_dir>
//! ```
//!
//! The 32-byte seed is read base64-encoded from the file named by
//! `GENRISK_SIGNING_KEY_B64_FILE`. Debug builds also accept it inline in
//! `GENRISK_SIGNING_KEY_B64`. The seed is zeroized after use.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use genrisk::adapters::artifacts::{
    sha256_hex, ArtifactManifest, ARTIFACT_FILES, MANIFEST_FILE, SIGNATURE_FILE,
};
use genrisk::adapters::{load_artifacts, IntegrityPolicy, Verification};

const KEY_FILE_ENV: &str = "GENRISK_SIGNING_KEY_B64_FILE";
const KEY_ENV_DEV: &str = "GENRISK_SIGNING_KEY_B64";
const MANIFEST_VERSION: u32 = 1;

#[derive(Zeroize, ZeroizeOnDrop)]
struct Seed([u8; 32]);

fn read_signing_seed_b64() -> Result<Zeroizing<String>> {
    let secret = if let Ok(path) = env::var(KEY_FILE_ENV) {
        let content = fs::read_to_string(path.trim())
            .with_context(|| format!("Failed reading signing key file {path:?}"))?;
        Zeroizing::new(content.trim_end_matches(['\n', '\r']).to_string())
    } else if cfg!(debug_assertions) {
        // Dev-only fallback for convenience.
        match env::var(KEY_ENV_DEV) {
            Ok(v) => Zeroizing::new(v.trim_end_matches(['\n', '\r']).to_string()),
            Err(_) => bail!("Missing signing key. Set {KEY_FILE_ENV} (or {KEY_ENV_DEV} in debug builds)."),
        }
    } else {
        bail!("Missing signing key. Set {KEY_FILE_ENV}.");
    };

    if secret.is_empty() {
        bail!("Empty signing key");
    }
    Ok(secret)
}

fn read_signing_seed() -> Result<Seed> {
    let b64 = read_signing_seed_b64()?;

    let raw = Zeroizing::new(
        general_purpose::STANDARD
            .decode(b64.trim())
            .map_err(|e| anyhow!("Invalid base64 in signing key: {e}"))?,
    );

    let seed: [u8; 32] = raw.as_slice().try_into().map_err(|_| {
        anyhow!(
            "Signing key seed must be 32 bytes after base64 decode (got {})",
            raw.len()
        )
    })?;
    Ok(Seed(seed))
}

fn parse_args() -> Result<PathBuf> {
    let usage = || anyhow!("Usage: sign_artifacts <model_dir>");
    let mut args = env::args().skip(1);
    let dir = args.next().ok_or_else(usage)?;
    if dir == "-h" || dir == "--help" || args.next().is_some() {
        return Err(usage());
    }
    Ok(PathBuf::from(dir))
}

fn main() -> Result<()> {
    let model_dir = parse_args()?;

    let mut files = BTreeMap::new();
    for name in ARTIFACT_FILES {
        let path = model_dir.join(name);
        let bytes = fs::read(&path).with_context(|| format!("Failed to read {path:?}"))?;
        files.insert(name.to_string(), sha256_hex(&bytes));
    }

    let manifest = ArtifactManifest {
        version: MANIFEST_VERSION,
        created_at: Some(chrono::Utc::now().timestamp()),
        files,
    };
    let manifest_bytes =
        serde_json::to_vec_pretty(&manifest).context("Failed to serialize manifest.json")?;

    let seed = read_signing_seed()?;
    let signing_key = SigningKey::from_bytes(&seed.0);
    drop(seed);
    let verifying_key = signing_key.verifying_key();

    let manifest_path = model_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, &manifest_bytes)
        .with_context(|| format!("Failed to write {manifest_path:?}"))?;

    let sig: Signature = signing_key.sign(&manifest_bytes);
    let sig_path = model_dir.join(SIGNATURE_FILE);
    fs::write(&sig_path, sig.to_bytes())
        .with_context(|| format!("Failed to write {sig_path:?}"))?;

    // Round-trip through the loader the application uses.
    let policy = IntegrityPolicy {
        require_signed: true,
        verifying_key: Some(verifying_key),
    };
    let loaded = load_artifacts(&model_dir, &policy).context("Signed artifacts failed to verify")?;
    if loaded.verification != Verification::Signed {
        bail!("Signed artifacts verified as {}", loaded.verification);
    }

    println!("Signed manifest: {manifest_path:?}");
    println!("Wrote signature: {sig_path:?}");
    println!(
        "GENRISK_ARTIFACT_PUBKEY_B64={}",
        general_purpose::STANDARD.encode(verifying_key.as_bytes())
    );

    Ok(())
}
