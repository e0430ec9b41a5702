/// Shop purchases and inventory item use.
///
/// Buying deducts the price and stacks the item into the inventory. Using consumes one
/// unit and applies the item's effect through the same paths task rewards use.
use log::info;
use serde::Serialize;

use crate::engine::achievement::evaluate_achievements;
use crate::engine::errors::EngineError;
use crate::engine::quest::add_quest_progress;
use crate::engine::reward::award_experience;
use crate::engine::types::{GameDocument, InventoryItem, ItemEffect, ShopItem};

#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    pub item: String,
    pub price: u64,
    pub coins_left: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemUse {
    pub item: String,
    pub effect: ItemEffect,
    /// Human readable summary of what changed.
    pub message: String,
    pub remaining: u32,
    pub unlocked: Vec<String>,
}

fn find_shop_item(doc: &GameDocument, item_name: &str) -> Option<ShopItem> {
    let wanted = item_name.trim();
    doc.shop
        .iter()
        .find(|item| item.name.eq_ignore_ascii_case(wanted))
        .cloned()
}

pub fn buy_item(doc: &mut GameDocument, item_name: &str) -> Result<Purchase, EngineError> {
    let item = find_shop_item(doc, item_name)
        .ok_or_else(|| EngineError::validation("Item not available"))?;
    if doc.player.coins < item.price {
        return Err(EngineError::insufficient("Insufficient coins"));
    }

    doc.player.coins -= item.price;
    let quantity = match doc.inventory.iter_mut().find(|slot| slot.name == item.name) {
        Some(slot) => {
            slot.quantity = slot.quantity.saturating_add(1);
            slot.quantity
        }
        None => {
            doc.inventory.push(InventoryItem {
                name: item.name.clone(),
                quantity: 1,
            });
            1
        }
    };
    info!("Bought {} for {} coins", item.name, item.price);

    Ok(Purchase {
        item: item.name,
        price: item.price,
        coins_left: doc.player.coins,
        quantity,
    })
}

pub fn use_item(doc: &mut GameDocument, item_name: &str) -> Result<ItemUse, EngineError> {
    let wanted = item_name.trim();
    let slot_index = doc
        .inventory
        .iter()
        .position(|slot| slot.quantity > 0 && slot.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| EngineError::validation("Item not available"))?;
    let name = doc.inventory[slot_index].name.clone();
    // Items whose catalogue entry disappeared cannot be applied.
    let item = find_shop_item(doc, &name)
        .ok_or_else(|| EngineError::validation("Item not available"))?;

    let mut unlocked = Vec::new();
    let message = match &item.effect {
        ItemEffect::RestoreEnergy { amount } => {
            let player = &mut doc.player;
            player.energy = player.energy.saturating_add(*amount).min(player.max_energy);
            format!("Energy restored to {}/{}", player.energy, player.max_energy)
        }
        ItemEffect::GrantExperience { amount } => {
            let outcome = award_experience(doc, *amount);
            unlocked.extend(outcome.unlocked);
            format!("Gained {} experience", amount)
        }
        ItemEffect::QuestProgress { quest, amount } => {
            let progress = add_quest_progress(doc, *quest, *amount)
                .ok_or_else(|| EngineError::validation("Item not available"))?;
            format!("{} progress {}/100", quest.as_str(), progress)
        }
        ItemEffect::GrantStatPoints { amount } => {
            let player = &mut doc.player;
            player.available_points = player.available_points.saturating_add(*amount);
            format!("Gained {} stat point(s)", amount)
        }
    };

    let slot = &mut doc.inventory[slot_index];
    slot.quantity -= 1;
    let remaining = slot.quantity;
    if remaining == 0 {
        doc.inventory.remove(slot_index);
    }
    unlocked.extend(evaluate_achievements(doc));
    info!("Used {}: {}", name, message);

    Ok(ItemUse {
        item: name,
        effect: item.effect,
        message,
        remaining,
        unlocked,
    })
}
