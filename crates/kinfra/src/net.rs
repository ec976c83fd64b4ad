use std::net::IpAddr;
use std::net::Ipv4Addr;

use crate::BuilderError;

/// accepts `<address>/<prefix>` with a prefix that fits the address family
pub(crate) fn parse_cidr(cidr: &str) -> Result<(IpAddr, u8), BuilderError> {
    let invalid = || BuilderError::InvalidCidr(cidr.to_owned());

    let (address, prefix) = cidr.split_once('/').ok_or_else(invalid)?;
    let address: IpAddr = address.parse().map_err(|_| invalid())?;

    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
    let max = if address.is_ipv4() { 32 } else { 128 };
    if prefix > max {
        return Err(invalid());
    }

    Ok((address, prefix))
}

pub(crate) fn parse_ip(field: &'static str, address: &str) -> Result<IpAddr, BuilderError> {
    address
        .parse()
        .map_err(|_| BuilderError::invalid_field(field, format!("{address:?} is not an IP address")))
}

pub(crate) fn parse_ipv4(field: &'static str, address: &str) -> Result<Ipv4Addr, BuilderError> {
    address
        .parse()
        .map_err(|_| BuilderError::invalid_field(field, format!("{address:?} is not an IPv4 address")))
}
