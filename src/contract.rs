//! This module contains types useful for dealing with concrete contracts that
//! you want to analyze.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::input::{Error, Result};

/// A representation of a contract that is passed to the library.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contract {
    /// The identifier under which facts about the contract are reported.
    id: BigUint,

    /// The bytecode of the contract, possibly still carrying its compiler
    /// metadata.
    bytecode: Vec<u8>,

    /// Jump targets supplied alongside the bytecode, which replace the targets
    /// that would otherwise be inferred.
    jumps: Option<BTreeMap<u32, BTreeSet<u32>>>,
}

impl Contract {
    /// Creates a new contract identified by `id` from the provided `bytecode`.
    #[must_use]
    pub fn new(id: impl Into<BigUint>, bytecode: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            bytecode,
            jumps: None,
        }
    }

    /// Creates a new contract identified by `id` from hexadecimal `text`,
    /// which may be prefixed by `0x` and surrounded by whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if `text` is not valid hexadecimal.
    pub fn from_hex(id: impl Into<BigUint>, text: &str) -> Result<Self> {
        let bytecode = hex::decode(strip_hex_prefix(text.trim()))?;
        Ok(Self::new(id, bytecode))
    }

    /// Creates a new contract identified by `id` from the file at `path`,
    /// which must contain the bytecode as hexadecimal text.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the file cannot be read or is not valid hexadecimal.
    pub fn from_hex_file(id: impl Into<BigUint>, path: impl AsRef<Path>) -> Result<Self> {
        Self::from_hex(id, &read_file(path.as_ref())?)
    }

    /// Creates a new contract from its JSON description.
    ///
    /// The description is an object with the fields:
    ///
    /// - `bytecode`: the hexadecimal bytecode of the contract.
    /// - `address`: the hexadecimal address of the contract, which becomes its
    ///   identifier.
    /// - `jumpDestinations` (optional): an object mapping the decimal program
    ///   counter of each jump to the list of its targets.
    ///
    /// ```
    /// use evm_fact_extractor::contract::Contract;
    /// use num_bigint::BigUint;
    ///
    /// let json = r#"{ "bytecode": "0x600056", "address": "0x2a" }"#;
    /// let contract = Contract::from_json_str(json).unwrap();
    /// assert_eq!(contract.bytecode(), &[0x60, 0x00, 0x56]);
    /// assert_eq!(contract.id(), &BigUint::from(42u32));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the description is not valid JSON, is missing a
    /// required field, or has a field with malformed contents.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let description: ContractDescription = serde_json::from_str(text)?;
        description.try_into()
    }

    /// Creates a new contract from the JSON description in the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the file cannot be read, or if its contents are not a
    /// valid description as per [`Self::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&read_file(path.as_ref())?)
    }

    /// Sets the jump targets of the contract to `jumps`, replacing those that
    /// would be inferred from the bytecode.
    #[must_use]
    pub fn with_jumps(mut self, jumps: BTreeMap<u32, BTreeSet<u32>>) -> Self {
        self.jumps = Some(jumps);
        self
    }

    /// Gets the identifier of the contract.
    #[must_use]
    pub fn id(&self) -> &BigUint {
        &self.id
    }

    /// Gets a reference to the bytecode of the contract.
    #[must_use]
    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }

    /// Gets the jump targets that were supplied with the contract, if any.
    #[must_use]
    pub fn jumps(&self) -> Option<&BTreeMap<u32, BTreeSet<u32>>> {
        self.jumps.as_ref()
    }
}

/// The parts of the JSON description of a contract that we care about.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDescription {
    bytecode: String,
    address:  String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    jump_destinations: Option<BTreeMap<String, Vec<u32>>>,
}

impl TryFrom<ContractDescription> for Contract {
    type Error = Error;

    fn try_from(value: ContractDescription) -> Result<Self> {
        let address = strip_hex_prefix(value.address.trim());
        let id = BigUint::parse_bytes(address.as_bytes(), 16)
            .ok_or_else(|| Error::InvalidAddress(value.address.clone()))?;
        let contract = Self::from_hex(id, &value.bytecode)?;

        let Some(sites) = value.jump_destinations else {
            return Ok(contract);
        };
        let jumps = sites
            .into_iter()
            .map(|(site, targets)| {
                let pc = site
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| Error::InvalidJumpSite(site.clone()))?;
                Ok((pc, targets.into_iter().collect()))
            })
            .collect::<Result<BTreeMap<u32, BTreeSet<u32>>>>()?;

        Ok(contract.with_jumps(jumps))
    }
}

fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::Io {
        path:    path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod test {
    use std::collections::{BTreeMap, BTreeSet};

    use num_bigint::BigUint;

    use crate::{contract::Contract, error::input::Error};

    #[test]
    fn can_read_prefixed_hex() -> anyhow::Result<()> {
        let contract = Contract::from_hex(1u32, " 0x6001600201\n")?;
        assert_eq!(contract.bytecode(), &[0x60, 0x01, 0x60, 0x02, 0x01]);
        assert_eq!(contract.id(), &BigUint::from(1u32));
        assert!(contract.jumps().is_none());

        Ok(())
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(Contract::from_hex(0u32, "600"), Err(Error::InvalidHexLength));
        assert_eq!(
            Contract::from_hex(0u32, "60zz"),
            Err(Error::InvalidHexCharacter('z', 2))
        );
    }

    #[test]
    fn can_read_json_with_jumps() -> anyhow::Result<()> {
        let json = r#"{
            "bytecode": "6001600957",
            "address": "0xdeadbeef",
            "jumpDestinations": { "4": [9, 12] }
        }"#;
        let contract = Contract::from_json_str(json)?;

        assert_eq!(contract.id(), &BigUint::from(0xdead_beef_u32));
        assert_eq!(
            contract.jumps(),
            Some(&BTreeMap::from([(4, BTreeSet::from([9, 12]))]))
        );

        Ok(())
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Contract::from_json_str(r#"{ "bytecode": "00" }"#),
            Err(Error::Json(_))
        ));
        assert_eq!(
            Contract::from_json_str(r#"{ "bytecode": "00", "address": "xyz" }"#),
            Err(Error::InvalidAddress("xyz".into()))
        );
        assert_eq!(
            Contract::from_json_str(
                r#"{ "bytecode": "00", "address": "0x1", "jumpDestinations": { "one": [] } }"#
            ),
            Err(Error::InvalidJumpSite("one".into()))
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = Contract::from_json_file("/nonexistent/contract.json");
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
