// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use num_bigint_dig::BigUint;
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::crypto::Stream;
use crate::error::Result;
use crate::keypair::{KeyPair, PrivateKey};

/// Directory under the storage root that receives `.enc` files.
pub const ENCRYPTED_DIR: &str = "encrypted";

const CHUNK_SIZE: usize = 8 * 1024;

/// An encrypted file on disk together with the keys that open it.
#[allow(missing_debug_implementations)]
pub struct StoredFile {
    path: PathBuf,
    keypair: KeyPair,
}

impl StoredFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    pub fn p(&self) -> &BigUint {
        self.keypair.private_key().p()
    }

    pub fn q(&self) -> &BigUint {
        self.keypair.private_key().q()
    }

    pub fn n(&self) -> &BigUint {
        self.keypair.public_key().n()
    }
}

/// File-level wrapper around the codec, rooted at an explicit directory.
///
/// Relative paths passed to its methods resolve against the root; absolute
/// paths are used as given.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    config: Config,
}

impl Storage {
    pub fn new<P: Into<PathBuf>>(root: P, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { root: root.into(), config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Encrypt `input` into `<root>/encrypted/<name>.enc` under fresh keys.
    ///
    /// Nothing is written to the destination if encryption fails.
    pub fn encrypt_file<P: AsRef<Path>>(&self, input: P, name: &str) -> Result<StoredFile> {
        let keypair = self.config.keypair_builder().build()?;

        let source = self.root.join(input);
        let dest = self.root.join(ENCRYPTED_DIR).join(format!("{name}.enc"));

        pump(keypair.encryptor(), &source, &dest)?;

        tracing::debug!(path = %dest.display(), "encrypted file stored");
        Ok(StoredFile { path: dest, keypair })
    }

    /// Decrypt `encrypted` into `output` with the two prime factors.
    ///
    /// Keys are validated before any file is created. An existing `output`
    /// is only replaced once decryption succeeds.
    pub fn decrypt_file<E, O>(&self, encrypted: E, output: O, p: &BigUint, q: &BigUint) -> Result<PathBuf>
    where
        E: AsRef<Path>,
        O: AsRef<Path>,
    {
        let key = PrivateKey::new(p.clone(), q.clone())?;
        let decryptor = key.decryptor_with_policy(self.config.decode)?;

        let source = self.root.join(encrypted);
        let dest = self.root.join(output);

        pump(decryptor, &source, &dest)?;

        tracing::debug!(path = %dest.display(), "decrypted file written");
        Ok(dest)
    }
}

/// Feed `source` through `stream` into `dest`.
///
/// Output is staged in a temporary file next to `dest` and only renamed over
/// it on success, so a failure leaves any existing `dest` untouched.
fn pump<S: Stream>(stream: S, source: &Path, dest: &Path) -> Result<()> {
    let reader = BufReader::new(File::open(source)?);

    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let staged = NamedTempFile::new_in(parent)?;
    copy_through(stream, reader, BufWriter::new(staged.as_file()))?;

    staged.persist(dest).map_err(|e| {
        tracing::warn!(path = %dest.display(), "could not move staged output into place");
        e.error
    })?;
    Ok(())
}

fn copy_through<S: Stream, R: Read, W: Write>(mut stream: S, mut reader: R, mut writer: W) -> Result<()> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        writer.write_all(&stream.update(&buf[..read])?)?;
    }

    writer.write_all(&stream.finalize()?)?;
    writer.flush()?;
    Ok(())
}
