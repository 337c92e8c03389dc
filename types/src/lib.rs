#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DvsPolarity {
    Off = 0,
    On = 1,
}

#[repr(packed)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DvsEvent<Timestamp, Width, Height> {
    pub t: Timestamp,
    pub x: Width,
    pub y: Height,
    pub polarity: DvsPolarity,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TriggerPolarity {
    Falling = 0,
    Rising = 1,
}

#[repr(packed)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TriggerEvent<Timestamp, Id> {
    pub t: Timestamp,
    pub id: Id,
    pub polarity: TriggerPolarity,
}
