//! Built-in room/item datasets.
//!
//! The engine is one; the games are data. Each function here assembles a
//! complete [`AdventureMap`] the resolver can run unmodified.

use crate::adventure::world::{AdventureMap, Direction, Interaction, Item, Room};

/// The compact cave puzzle.
///
/// Four rooms: an entrance with an unlit torch, a main chamber, a puzzle
/// room with a key and a pedestal, and a dark side room hiding the
/// treasure. Two ways to win: fit the key into the pedestal, or carry the
/// treasure out of the dark.
pub fn cave_puzzle() -> AdventureMap {
    AdventureMap::builder("entrance")
        .room(
            Room::new(
                "entrance",
                "Cave Entrance",
                "Daylight fades behind you. The cave mouth opens into shadow.",
            )
            .exit(Direction::East, "mainChamber")
            .item("torch")
            .interaction(
                "walls",
                Interaction::text("The walls are scored with old tool marks. Miners were here once."),
            ),
        )
        .room(
            Room::new(
                "mainChamber",
                "Main Chamber",
                "A wide chamber where every footstep echoes twice.",
            )
            .exit(Direction::West, "entrance")
            .exit(Direction::East, "puzzleRoom")
            .exit(Direction::North, "darkRoom")
            .interaction(
                "echo",
                Interaction::text("You call out. The chamber answers in your own voice, twice."),
            ),
        )
        .room(
            Room::new(
                "puzzleRoom",
                "Puzzle Room",
                "A small round room. A stone pedestal stands at its center.",
            )
            .exit(Direction::West, "mainChamber")
            .item("key")
            .interaction(
                "pedestal",
                Interaction::text(
                    "The pedestal bears a keyhole-shaped slot, worn smooth by many hands.",
                ),
            ),
        )
        .room(
            Room::new(
                "darkRoom",
                "Dark Room",
                "The blackness here is total. The air tastes of dust and metal.",
            )
            .exit(Direction::South, "mainChamber")
            .item("treasure")
            .dark(),
        )
        .item(
            Item::new("torch", "Unlit Torch", "A pitch-soaked torch, ready to be lit.")
                .takeable()
                .usable_with("darkness"),
        )
        .item(
            Item::new("litTorch", "Lit Torch", "Its flame gutters but holds.")
                .takeable()
                .usable_with("darkness"),
        )
        .item(
            Item::new("key", "Iron Key", "Heavy, cold, and older than the cave's name.")
                .takeable()
                .usable_with("pedestal"),
        )
        .item(
            Item::new(
                "treasure",
                "Miners' Hoard",
                "A strongbox of coin and raw silver, abandoned in the dark.",
            )
            .takeable(),
        )
        .torch("torch", "litTorch")
        .win_use(
            "key",
            "pedestal",
            "puzzleRoom",
            "The key turns with a deep click. You have solved the puzzle of the cave.",
        )
        .treasure("treasure")
        .turn_limit(20)
        .build()
        .expect("cave puzzle map is internally consistent")
}

/// A larger keep-crawl on the same engine.
///
/// Six rooms, a lantern instead of a torch, and a single treasure goal.
/// Exists mainly to show that the engine is parameterized by data, not
/// specialized per game.
pub fn ruined_keep() -> AdventureMap {
    AdventureMap::builder("courtyard")
        .room(
            Room::new(
                "courtyard",
                "Overgrown Courtyard",
                "Ivy has pulled half the flagstones loose. The keep looms ahead.",
            )
            .exit(Direction::North, "greatHall")
            .exit(Direction::East, "stables")
            .interaction(
                "well",
                Interaction::text("The well is dry. Something glimmers far below, out of reach."),
            ),
        )
        .room(
            Room::new(
                "stables",
                "Collapsed Stables",
                "Rotten beams and the smell of old straw.",
            )
            .exit(Direction::West, "courtyard")
            .item("lantern"),
        )
        .room(
            Room::new(
                "greatHall",
                "Great Hall",
                "Long tables lie overturned beneath a sagging roof.",
            )
            .exit(Direction::South, "courtyard")
            .exit(Direction::East, "kitchen")
            .exit(Direction::North, "chapel")
            .interaction(
                "tapestry",
                Interaction::text("Behind the rotting tapestry a small flask was hidden.")
                    .reveals("flask"),
            ),
        )
        .room(
            Room::new("kitchen", "Kitchen", "Soot-black hearths and shattered crockery.")
                .exit(Direction::West, "greatHall")
                .item("flint"),
        )
        .room(
            Room::new(
                "chapel",
                "Ruined Chapel",
                "The altar stone is cracked. Stairs descend into blackness.",
            )
            .exit(Direction::South, "greatHall")
            .exit(Direction::North, "crypt"),
        )
        .room(
            Room::new(
                "crypt",
                "Crypt",
                "Cold beyond reason. No light from above reaches this deep.",
            )
            .exit(Direction::South, "chapel")
            .item("crown")
            .dark(),
        )
        .item(
            Item::new("lantern", "Cold Lantern", "An oil lantern, unlit but full.")
                .takeable()
                .usable_with("darkness"),
        )
        .item(
            Item::new("litLantern", "Burning Lantern", "It throws a steady amber circle.")
                .takeable()
                .usable_with("darkness"),
        )
        .item(Item::new("flint", "Flint and Steel", "Good for a spark.").takeable())
        .item(Item::new("flask", "Silver Flask", "Empty, but finely made.").takeable())
        .item(
            Item::new(
                "crown",
                "Iron Crown",
                "The old lord's crown, black iron set with garnets.",
            )
            .takeable(),
        )
        .torch("lantern", "litLantern")
        .treasure("crown")
        .turn_limit(20)
        .build()
        .expect("ruined keep map is internally consistent")
}
