use std::fmt;

/// Wire discriminator of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Opcode {
    FieldFetch = 0,
    MethodCall = 1,
    MethodReturn = 2,
    NewObject = 3,
}

impl Opcode {
    pub const ALL: [Opcode; 4] = [
        Self::FieldFetch,
        Self::MethodCall,
        Self::MethodReturn,
        Self::NewObject,
    ];

    #[must_use]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    #[must_use]
    pub const fn from_u16(raw: u16) -> Option<Self> {
        match raw {
            0 => Some(Self::FieldFetch),
            1 => Some(Self::MethodCall),
            2 => Some(Self::MethodReturn),
            3 => Some(Self::NewObject),
            _ => None,
        }
    }

    /// Whether the executor answers this packet with a `MethodReturn`.
    pub const fn is_request(self) -> bool {
        !matches!(self, Self::MethodReturn)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FieldFetch => "FieldFetch",
            Self::MethodCall => "MethodCall",
            Self::MethodReturn => "MethodReturn",
            Self::NewObject => "NewObject",
        })
    }
}
