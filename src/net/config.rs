// Interface addressing and MAC selection
//
// The MAC comes from an EUI-48 EEPROM when the board has one, else the
// fixed demo address. Every outcome is logged; none is fatal.

use core::fmt;
use core::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Locally administered address used when no EEPROM provides one.
    pub const DEMO: Self = MacAddress([0x3a, 0x1f, 0x34, 0x08, 0x54, 0x54]);
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", a, b, c, d, e, g)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eui48Error {
    /// EEPROM did not respond to configuration
    NotPresent,
    /// EEPROM model has no EUI-48 area
    Unsupported,
    /// EEPROM present but the read failed
    Read,
}

impl fmt::Display for Eui48Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eui48Error::NotPresent => write!(f, "could not configure EEPROM"),
            Eui48Error::Unsupported => write!(f, "EEPROM does not support EUI-48"),
            Eui48Error::Read => write!(f, "failed reading MAC address from EEPROM"),
        }
    }
}

/// Factory-programmed address storage (AT24-style EEPROM).
pub trait Eui48Source {
    fn read_eui48(&mut self) -> Result<MacAddress, Eui48Error>;
}

/// Board with no address storage fitted.
pub struct NoEeprom;

impl Eui48Source for NoEeprom {
    fn read_eui48(&mut self) -> Result<MacAddress, Eui48Error> {
        Err(Eui48Error::NotPresent)
    }
}

pub fn resolve_mac<E: Eui48Source>(source: Option<&mut E>, default: MacAddress) -> MacAddress {
    if let Some(eeprom) = source {
        match eeprom.read_eui48() {
            Ok(mac) => {
                log::info!("net: MAC address initialized using EEPROM");
                return mac;
            }
            Err(Eui48Error::Unsupported) => log::info!("net: {}", Eui48Error::Unsupported),
            Err(e) => log::warn!("net: {}", e),
        }
    }
    log::info!("net: using default MAC address");
    default
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    Static {
        ip: Ipv4Addr,
        gateway: Ipv4Addr,
        netmask: Ipv4Addr,
    },
    Dhcp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetConfig {
    pub mac: MacAddress,
    pub addressing: Addressing,
}

impl NetConfig {
    pub const fn demo() -> Self {
        Self {
            mac: MacAddress::DEMO,
            addressing: Addressing::Static {
                ip: Ipv4Addr::new(192, 168, 1, 3),
                gateway: Ipv4Addr::new(192, 168, 1, 2),
                netmask: Ipv4Addr::new(255, 255, 255, 0),
            },
        }
    }

    pub const fn with_dhcp(mut self) -> Self {
        self.addressing = Addressing::Dhcp;
        self
    }

    pub fn dhcp(&self) -> bool {
        matches!(self.addressing, Addressing::Dhcp)
    }

    /// (ip, netmask, gateway) to hand the stack; all zero under DHCP.
    pub fn interface_addresses(&self) -> (Ipv4Addr, Ipv4Addr, Ipv4Addr) {
        match self.addressing {
            Addressing::Static {
                ip,
                gateway,
                netmask,
            } => (ip, netmask, gateway),
            Addressing::Dhcp => (
                Ipv4Addr::UNSPECIFIED,
                Ipv4Addr::UNSPECIFIED,
                Ipv4Addr::UNSPECIFIED,
            ),
        }
    }

    /// Boot printout: the MAC, then either the static addresses or
    /// the DHCP marker.
    pub fn summary(&self) -> impl Iterator<Item = SummaryLine> {
        let addressing = match self.addressing {
            Addressing::Static {
                ip,
                gateway,
                netmask,
            } => [
                Some(SummaryLine::HostIp(ip)),
                Some(SummaryLine::Gateway(gateway)),
                Some(SummaryLine::Netmask(netmask)),
            ],
            Addressing::Dhcp => [Some(SummaryLine::Dhcp), None, None],
        };
        core::iter::once(SummaryLine::Mac(self.mac)).chain(addressing.into_iter().flatten())
    }

    pub fn log_summary(&self) {
        for line in self.summary() {
            log::info!(" - {}", line);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryLine {
    Mac(MacAddress),
    HostIp(Ipv4Addr),
    Gateway(Ipv4Addr),
    Netmask(Ipv4Addr),
    Dhcp,
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Mac(mac) => write!(f, "MAC {}", mac),
            SummaryLine::HostIp(ip) => write!(f, "Host IP  {}", ip),
            SummaryLine::Gateway(ip) => write!(f, "Gateway IP  {}", ip),
            SummaryLine::Netmask(ip) => write!(f, "Net Mask  {}", ip),
            SummaryLine::Dhcp => write!(f, "DHCP Enabled"),
        }
    }
}

impl Default for NetConfig {
    fn default() -> Self {
        Self::demo()
    }
}
