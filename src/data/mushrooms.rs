use crate::shared::*;

/// Populate the MushroomRegistry with the huntable species.
///
/// Spawns pick a species uniformly; rarity is rolled separately per
/// instance, so every species has a dex row for all four rarities.
pub fn populate_mushrooms(registry: &mut MushroomRegistry) {
    let species = [
        ("button", "Button Mushroom"),
        ("enoki", "Enoki"),
        ("shiitake", "Shiitake"),
        ("oyster", "Oyster Mushroom"),
        ("porcini", "Porcini"),
        ("chanterelle", "Chanterelle"),
        ("morel", "Morel"),
        ("matsutake", "Matsutake"),
        ("king_boletus", "King Boletus"),
        ("black_truffle", "Black Truffle"),
    ];

    registry.species = species
        .iter()
        .map(|(id, name)| MushroomSpeciesDef {
            id: (*id).to_string(),
            name: (*name).to_string(),
        })
        .collect();
}
