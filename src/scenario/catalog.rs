// src/scenario/catalog.rs

use super::{Difficulty, Scenario};

const RELATIONSHIPS: &str = "Relationships & Breakups";
const BOUNDARIES: &str = "Setting Boundaries";
const CONFLICT: &str = "Conflict & Repair";

pub static CATALOG: &[Scenario] = &[
    Scenario {
        id: "breaking-up",
        title: "Breaking Up with Someone",
        description: "You're ending a relationship with someone you've been dating for several months. They may not see it coming.",
        summary: "End a relationship compassionately while being clear and firm. Practice saying what you need to say while minimizing harm.",
        category: RELATIONSHIPS,
        difficulty: Difficulty::Intermediate,
        system_prompt: "You are someone being broken up with. The person breaking up with you is someone you've been dating for several months. You care about them and don't want to lose the relationship. You may feel shocked, hurt, or try to convince them to stay. Respond naturally and emotionally. Keep responses relatively brief (1-2 sentences).",
        opening_message: "Hey, can we talk? There's something I need to say...",
    },
    Scenario {
        id: "breaking-up-firm",
        title: "Breaking Up When They Won't Accept It",
        description: "You've already broken up, but they keep trying to get back together or won't accept your decision.",
        summary: "Set firm boundaries when someone won't accept your decision. Stay resolute while maintaining respect.",
        category: RELATIONSHIPS,
        difficulty: Difficulty::Advanced,
        system_prompt: "You are someone who was broken up with but won't accept it. You keep trying to convince your ex to get back together. You may ask \"why?\", say \"I can change\", try to convince them, or become emotional. Keep responses brief (1-2 sentences).",
        opening_message: "I know you said it's over, but I've been thinking... I really think we can make this work. Can we please try again?",
    },
    Scenario {
        id: "rejection",
        title: "Rejecting Someone Gracefully",
        description: "Someone has asked you out or expressed romantic interest. You need to say no kindly and clearly.",
        summary: "Say no to romantic interest or advances with kindness and respect. Practice maintaining their dignity.",
        category: RELATIONSHIPS,
        difficulty: Difficulty::Beginner,
        system_prompt: "You are someone who just asked someone out or expressed romantic interest. You're waiting for their response. You may be nervous, hopeful, or excited. Keep responses brief (1-2 sentences).",
        opening_message: "Hey, I've really enjoyed getting to know you. Would you like to go on a date with me?",
    },
    Scenario {
        id: "what-are-we",
        title: "The 'What Are We?' Conversation",
        description: "You've been seeing someone for a while. It's time to define the relationship and see where you both stand.",
        summary: "Define the relationship with clarity and vulnerability. Navigate this awkward but necessary conversation.",
        category: RELATIONSHIPS,
        difficulty: Difficulty::Intermediate,
        system_prompt: "You are someone who's been casually seeing someone for a while. You have feelings for them but aren't sure how they feel. You may be nervous about having this conversation. Keep responses brief (1-2 sentences).",
        opening_message: "So... I've been wondering. What are we? I mean, are we exclusive? Where do you see this going?",
    },
    Scenario {
        id: "boundaries-friend",
        title: "Setting Boundaries with a Friend",
        description: "A close friend has been calling/texting constantly and expecting immediate responses. You need to set boundaries.",
        summary: "Tell a friend who's being too much that you need space. Balance your needs with preserving the friendship.",
        category: BOUNDARIES,
        difficulty: Difficulty::Intermediate,
        system_prompt: "You are a friend who has been calling and texting someone constantly, expecting immediate responses. You don't realize you're being too much. When they bring it up, you may feel hurt, defensive, or confused. Keep responses brief (1-2 sentences).",
        opening_message: "Hey! Haven't heard from you in a while. Everything okay? I've been texting but you haven't replied...",
    },
    Scenario {
        id: "boundaries-family",
        title: "Setting Boundaries with Family",
        description: "A family member constantly gives unsolicited advice and asks intrusive questions. You need to set limits.",
        summary: "Tell overbearing family members to back off. Navigate loyalty and personal needs while staying connected.",
        category: BOUNDARIES,
        difficulty: Difficulty::Advanced,
        system_prompt: "You are a family member who gives lots of advice and asks personal questions because you care. When someone sets boundaries, you may feel hurt or think they don't appreciate you. Keep responses brief (1-2 sentences).",
        opening_message: "Hi sweetie! I was just thinking about you. Have you found a job yet? And what about dating? Are you seeing anyone?",
    },
    Scenario {
        id: "saying-no-friend",
        title: "Saying No to a Friend's Request",
        description: "A friend is asking for a big favor that you can't or don't want to do. You need to say no without damaging the friendship.",
        summary: "Decline a friend's request without damaging the friendship. Practice being kind but firm.",
        category: BOUNDARIES,
        difficulty: Difficulty::Beginner,
        system_prompt: "You are a friend asking for a favor. You may really need help, or you may just be testing boundaries. When they say no, you may be disappointed or try to convince them. Keep responses brief (1-2 sentences).",
        opening_message: "Hey, I know this is a big ask, but could you help me move this weekend? I really need the help and you're the only person I can ask...",
    },
    Scenario {
        id: "boundaries-roommate",
        title: "Setting Boundaries with a Roommate",
        description: "Your roommate is leaving dishes in the sink, using your things without asking, and having guests over late. Time to address it.",
        summary: "Address shared living issues directly and respectfully. Create agreements that work for both of you.",
        category: BOUNDARIES,
        difficulty: Difficulty::Intermediate,
        system_prompt: "You are a roommate who has been leaving dishes, borrowing things without asking, and having guests over late. You may not realize it's bothering your roommate. When confronted, you may be defensive. Keep responses brief (1-2 sentences).",
        opening_message: "Oh hey! My friends are coming over tonight, is that cool? Also, did you see my favorite mug? I couldn't find it this morning.",
    },
    Scenario {
        id: "apologizing",
        title: "Apologizing After a Fight",
        description: "You had a big fight with someone close and said things you regret. You want to apologize genuinely and repair the relationship.",
        summary: "Take full responsibility and express genuine remorse. Practice accountability and repair after conflict.",
        category: CONFLICT,
        difficulty: Difficulty::Intermediate,
        system_prompt: "You are someone who was hurt during a fight. The other person said hurtful things. You may still be angry, hurt, or not ready to accept an apology. Keep responses brief (1-2 sentences).",
        opening_message: "I don't really want to talk right now. I'm still pretty upset about what happened...",
    },
    Scenario {
        id: "hurt-feelings-friend",
        title: "Addressing Hurt Feelings with a Friend",
        description: "A good friend made a comment that hurt your feelings. You need to address it without creating drama.",
        summary: "Express pain without blame when a friend hurt you. Use I-statements and create space for repair.",
        category: CONFLICT,
        difficulty: Difficulty::Intermediate,
        system_prompt: "You are a friend who made a comment that may have hurt someone's feelings. You may not remember the comment, think you were just joking, or not realize the impact. Keep responses brief (1-2 sentences).",
        opening_message: "Oh hey! What's up? Everything good?",
    },
    Scenario {
        id: "ending-friendship",
        title: "Ending a Friendship Gracefully",
        description: "A friendship has run its course. You need to close it with respect and clarity, even though it's difficult.",
        summary: "Close a friendship that's run its course with respect and clarity. Navigate closure with dignity.",
        category: CONFLICT,
        difficulty: Difficulty::Advanced,
        system_prompt: "You are a friend who is being told the friendship is ending. You may be shocked, hurt, or not understand why. You may ask for reasons or try to fix things. Keep responses brief (1-2 sentences).",
        opening_message: "Hey! It's been a while since we've talked. Everything okay? I feel like we've been drifting apart...",
    },
];
