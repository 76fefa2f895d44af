pub const ARENA_SIZE: u8 = 28;
pub const HALF_ARENA: u8 = 14;

/// Row that holds the outer screen of filters in the randomized layout.
pub const FILTER_ROW: u8 = 13;

/// Row directly behind the screen where destructors go.
pub const DESTRUCTOR_ROW: u8 = 12;

/// Column left without reinforcement so our own attackers keep a lane.
pub const DEFAULT_OPENING_COLUMN: u8 = 16;

/// Once more than this many destructor gaps remain, fill destructors ahead of
/// filters.
pub const DESTRUCTOR_SATURATION_THRESHOLD: usize = 22;

/// Size of a ping wave when using the fixed ping strategy.
pub const PING_WAVE_SIZE: u32 = 11;

/// Size of an EMP wave when using the fixed EMP strategy.
pub const EMP_WAVE_SIZE: u32 = 3;

/// Size of an EMP wave when launching down a randomly picked lane.
pub const EMP_LANE_WAVE_SIZE: u32 = 5;

/// Last turn on which a scout is sent when a full wave is unaffordable.
pub const SCOUT_UNTIL_TURN: u32 = 5;

/// Engine `turnInfo[0]` value for the deploy phase.
pub const PHASE_DEPLOY: u8 = 0;

/// Engine `turnInfo[0]` value for the end-of-game frame.
pub const PHASE_END: u8 = 2;
